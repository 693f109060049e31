use super::*;

/// Provider for a runtime that lacks MD5 entirely.
struct NoMd5;

impl DigestProvider for NoMd5 {
    fn sha1(&self, data: &[u8]) -> Result<String, DigestFailure> {
        NativeDigests.sha1(data)
    }

    fn md5(&self, _data: &[u8]) -> Result<String, DigestFailure> {
        Err(DigestFailure::Unsupported)
    }
}

/// Provider whose primitives fail outright.
struct Broken;

impl DigestProvider for Broken {
    fn sha1(&self, _data: &[u8]) -> Result<String, DigestFailure> {
        Err(DigestFailure::Failed("engine crashed".into()))
    }

    fn md5(&self, _data: &[u8]) -> Result<String, DigestFailure> {
        Err(DigestFailure::Failed("engine crashed".into()))
    }
}

#[test]
fn test_crc32_single_byte() {
    assert_eq!(crc32_hex(b"a"), "E8B7BE43");
}

#[test]
fn test_crc32_known_vectors() {
    assert_eq!(crc32_hex(b""), "00000000");
    assert_eq!(crc32_hex(b"123456789"), "CBF43926");
}

#[test]
fn test_crc32_is_eight_uppercase_hex() {
    for data in [&b""[..], b"\x00", b"Hello, World!", &[0xFFu8; 4096]] {
        let crc = crc32_hex(data);
        assert_eq!(crc.len(), 8);
        assert!(crc.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        assert_eq!(crc, crc32_hex(data));
    }
}

#[test]
fn test_native_digests() {
    let set = digest_native(b"abc");
    assert_eq!(set.crc32, DigestValue::Hex("352441C2".into()));
    assert_eq!(set.md5, DigestValue::Hex("900150983cd24fb0d6963f7d28e17f72".into()));
    assert_eq!(
        set.sha1,
        DigestValue::Hex("a9993e364706816aba3e25717850c26c9cd0d89d".into())
    );
}

#[test]
fn test_unsupported_md5_uses_placeholder() {
    let set = digest(b"abc", &NoMd5);
    let DigestValue::Placeholder(ref p) = set.md5 else {
        panic!("expected placeholder, got {:?}", set.md5);
    };
    assert_eq!(p.len(), 32);
    assert_eq!(&p[0..8], &p[8..16]);
    assert_eq!(p, &placeholder_md5(b"abc"));
    // Placeholders never match, not even their own text
    assert!(!set.md5.matches(Some(p)));
    assert!(set.sha1.hex().is_some());
}

#[test]
fn test_placeholder_only_reads_first_kilobyte() {
    let mut a = vec![7u8; 1024];
    let mut b = a.clone();
    a.extend_from_slice(&[1, 2, 3]);
    b.extend_from_slice(&[9, 9, 9, 9]);
    assert_eq!(placeholder_md5(&a), placeholder_md5(&b));
}

#[test]
fn test_failed_digests_become_unavailable() {
    let set = digest(b"abc", &Broken);
    assert_eq!(set.md5, DigestValue::Unavailable);
    assert_eq!(set.sha1, DigestValue::Unavailable);
    assert_eq!(set.sha1.to_string(), "unavailable");
    // CRC32 never depends on the provider
    assert!(set.crc32.hex().is_some());
}

#[test]
fn test_matches_is_case_insensitive() {
    let v = DigestValue::Hex("abcd1234".into());
    assert!(v.matches(Some("ABCD1234")));
    assert!(!v.matches(Some("abcd1235")));
    assert!(!v.matches(None));
}

#[test]
fn test_unavailable_never_matches() {
    assert!(!DigestValue::Unavailable.matches(Some("unavailable")));
    assert!(!DigestValue::Hex("unavailable".into()).matches(Some("UNAVAILABLE")));
}
