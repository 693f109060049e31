use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use romcheck_core::{Platform, Region};
use serde::{Deserialize, Serialize};

use crate::classify::Classifier;
use crate::error::DatError;

/// One known-good file record from a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Canonical file name, including its extension
    pub name: String,
    /// Expected size in bytes; 0 when the catalog omits it
    pub size: u64,
    /// MD5 (lowercase hex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    /// SHA-1 (lowercase hex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    /// CRC32 (uppercase hex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crc32: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    /// Region label, e.g. "USA"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Catalog-level metadata from the header block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogHeader {
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
}

impl CatalogHeader {
    fn apply(&mut self, key: &str, value: String) {
        match key {
            "name" => self.name = Some(value),
            "description" => self.description = Some(value),
            "version" => self.version = Some(value),
            _ => {}
        }
    }
}

/// Whether a document is in the Logiqx XML dialect.
pub fn is_markup(text: &str) -> bool {
    text.trim_start().starts_with("<?xml") || text.contains("<datafile")
}

/// Parse a catalog document (Logiqx XML or ClrMamePro), auto-detecting the
/// dialect.
///
/// Every entry is tagged with `known` when given; otherwise the platform is
/// inferred from the rom name and size, then from the game name. Blocks
/// missing a game or rom name are skipped. An empty document yields no
/// entries.
pub fn parse_catalog(text: &str, known: Option<Platform>) -> Result<Vec<ReferenceEntry>, DatError> {
    parse_catalog_with(text, known, &Classifier::default())
}

/// [`parse_catalog`] with an explicit classifier for platform inference.
pub fn parse_catalog_with(
    text: &str,
    known: Option<Platform>,
    classifier: &Classifier,
) -> Result<Vec<ReferenceEntry>, DatError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = EntryBuilder { known, classifier, entries: Vec::new() };
    if is_markup(text) {
        parse_xml(text, &mut builder)?;
    } else {
        parse_clrmamepro(text, &mut builder);
    }
    Ok(builder.entries)
}

/// Read only the header block of a catalog document.
pub fn parse_catalog_header(text: &str) -> Result<CatalogHeader, DatError> {
    if is_markup(text) {
        xml_header(text)
    } else {
        Ok(clrmamepro_header(text))
    }
}

// ---------------------------------------------------------------------------
// Entry assembly
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct GameRecord {
    name: Option<String>,
    description: Option<String>,
    region: Option<String>,
}

impl GameRecord {
    /// Record a game attribute. The first `name` wins.
    fn apply(&mut self, key: &str, value: String) {
        match key {
            "name" if self.name.is_none() => self.name = Some(value),
            "description" => self.description = Some(value),
            "region" => self.region = Some(value),
            _ => {}
        }
    }
}

#[derive(Debug, Default)]
struct RomRecord {
    name: Option<String>,
    size: Option<u64>,
    crc32: Option<String>,
    md5: Option<String>,
    sha1: Option<String>,
}

impl RomRecord {
    /// Overwrite fields present in `other`.
    fn merge(&mut self, other: RomRecord) {
        if other.name.is_some() {
            self.name = other.name;
        }
        if other.size.is_some() {
            self.size = other.size;
        }
        if other.crc32.is_some() {
            self.crc32 = other.crc32;
        }
        if other.md5.is_some() {
            self.md5 = other.md5;
        }
        if other.sha1.is_some() {
            self.sha1 = other.sha1;
        }
    }
}

struct EntryBuilder<'a> {
    known: Option<Platform>,
    classifier: &'a Classifier,
    entries: Vec<ReferenceEntry>,
}

impl EntryBuilder<'_> {
    fn emit(&mut self, game: &GameRecord, rom: &RomRecord) {
        let (Some(game_name), Some(rom_name)) = (game.name.as_deref(), rom.name.as_deref()) else {
            return;
        };
        if game_name.is_empty() || rom_name.is_empty() {
            return;
        }

        let size = rom.size.unwrap_or(0);
        let platform = self.known.or_else(|| {
            self.classifier
                .classify(rom_name, size)
                .or_else(|| self.classifier.classify(game_name, size))
        });
        let region = game
            .region
            .clone()
            .or_else(|| Region::from_name(game_name).map(|r| r.name().to_string()));

        self.entries.push(ReferenceEntry {
            name: rom_name.to_string(),
            size,
            md5: rom.md5.clone(),
            sha1: rom.sha1.clone(),
            crc32: rom.crc32.clone(),
            platform,
            region,
            description: game.description.clone(),
        });
    }
}

// ---------------------------------------------------------------------------
// Logiqx XML parser
// ---------------------------------------------------------------------------

fn parse_xml(text: &str, builder: &mut EntryBuilder<'_>) -> Result<(), DatError> {
    let mut xml = Reader::from_str(text);
    xml.config_mut().trim_text(true);

    let mut game: Option<GameRecord> = None;
    let mut roms: Vec<RomRecord> = Vec::new();
    let mut in_description = false;

    loop {
        match xml.read_event()? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"game" | b"machine" => {
                    game = Some(GameRecord {
                        name: xml_attr(e, b"name")?,
                        ..GameRecord::default()
                    });
                    roms.clear();
                }
                b"rom" if game.is_some() => roms.push(xml_rom(e)?),
                b"description" if game.is_some() => in_description = true,
                _ => {}
            },
            Event::Empty(ref e) => {
                if e.name().as_ref() == b"rom" && game.is_some() {
                    roms.push(xml_rom(e)?);
                }
            }
            Event::Text(ref e) => {
                if in_description {
                    if let Some(ref mut g) = game {
                        g.description = Some(e.unescape()?.into_owned());
                    }
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"description" => in_description = false,
                b"game" | b"machine" => {
                    if let Some(g) = game.take() {
                        for rom in roms.drain(..) {
                            builder.emit(&g, &rom);
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(())
}

fn xml_attr(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, DatError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn xml_rom(e: &BytesStart<'_>) -> Result<RomRecord, DatError> {
    let mut rom = RomRecord::default();
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;
        match attr.key.as_ref() {
            b"name" => rom.name = Some(value.into_owned()),
            b"size" => rom.size = Some(value.trim().parse().unwrap_or(0)),
            b"crc" => rom.crc32 = Some(value.to_uppercase()),
            b"md5" => rom.md5 = Some(value.to_lowercase()),
            b"sha1" => rom.sha1 = Some(value.to_lowercase()),
            _ => {}
        }
    }
    Ok(rom)
}

fn xml_header(text: &str) -> Result<CatalogHeader, DatError> {
    let mut xml = Reader::from_str(text);
    xml.config_mut().trim_text(true);

    let mut header = CatalogHeader::default();
    let mut in_header = false;
    let mut current_tag = Vec::new();

    loop {
        match xml.read_event()? {
            Event::Start(ref e) => {
                let name = e.name().as_ref().to_vec();
                match name.as_slice() {
                    b"header" => in_header = true,
                    b"game" | b"machine" => break,
                    _ => current_tag = name,
                }
            }
            Event::Text(ref e) if in_header => {
                let value = Some(e.unescape()?.into_owned());
                match current_tag.as_slice() {
                    b"name" => header.name = value,
                    b"description" => header.description = value,
                    b"version" => header.version = value,
                    _ => {}
                }
            }
            Event::End(ref e) => {
                if e.name().as_ref() == b"header" {
                    break;
                }
                current_tag.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(header)
}

// ---------------------------------------------------------------------------
// ClrMamePro parser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    OutsideHeader,
    InsideHeader,
    InsideGame,
    InsideRom,
}

/// Line-oriented state machine over a ClrMamePro document.
///
/// ```text
/// clrmamepro (
///     name "System Name"
///     version 20240101-000000
/// )
///
/// game (
///     name "Game Name (Region)"
///     rom ( name "Game Name (Region).ext" size 12345 crc AABBCCDD sha1 ... )
/// )
/// ```
///
/// Rom blocks may also span several lines, closed by a lone `)`. A whole
/// game may sit on one line. A game opener always starts a new record, even
/// when the previous block was never closed.
fn parse_clrmamepro(text: &str, builder: &mut EntryBuilder<'_>) {
    let mut state = LineState::OutsideHeader;
    let mut game = GameRecord::default();
    let mut rom = RomRecord::default();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let closes = trimmed == ")";
        let opened = block_open(trimmed);

        if let Some((keyword, rest)) = opened
            && is_game_block(keyword)
        {
            if state == LineState::InsideRom {
                log::debug!("Dropping unclosed rom block in {:?}", game.name);
            }
            game = GameRecord::default();
            rom = RomRecord::default();
            state = open_game(rest, &mut game, &mut rom, builder);
            continue;
        }

        match state {
            LineState::OutsideHeader => {
                if let Some((_, rest)) = opened
                    && paren_depth(rest) >= 0
                {
                    state = LineState::InsideHeader;
                }
            }
            LineState::InsideHeader => {
                if closes {
                    state = LineState::OutsideHeader;
                }
            }
            LineState::InsideGame => {
                if closes {
                    game = GameRecord::default();
                    state = LineState::OutsideHeader;
                } else if let Some(("rom", rest)) = opened {
                    rom = rom_attributes(rest);
                    let depth = paren_depth(rest);
                    if depth < 0 {
                        builder.emit(&game, &rom);
                        rom = RomRecord::default();
                    } else {
                        state = LineState::InsideRom;
                    }
                    if depth < -1 {
                        game = GameRecord::default();
                        state = LineState::OutsideHeader;
                    }
                } else if let Some((key, value)) = parse_kv(trimmed) {
                    game.apply(key, value);
                }
            }
            LineState::InsideRom => {
                if closes {
                    builder.emit(&game, &rom);
                    rom = RomRecord::default();
                    state = LineState::InsideGame;
                } else {
                    rom.merge(rom_attributes(trimmed));
                }
            }
        }
    }
}

/// Handle the text after a game opener, including any rom blocks written on
/// the same line. Returns the state for the next line.
fn open_game(
    rest: &str,
    game: &mut GameRecord,
    rom: &mut RomRecord,
    builder: &mut EntryBuilder<'_>,
) -> LineState {
    let mut parts = split_rom_blocks(rest).into_iter();
    if let Some(head) = parts.next() {
        let tokens = tokenize(head);
        for pair in tokens.chunks_exact(2) {
            game.apply(&pair[0], pair[1].clone());
        }
    }

    let mut rom_open = false;
    for part in parts {
        *rom = rom_attributes(part);
        rom_open = paren_depth(part) >= 0;
        if !rom_open {
            builder.emit(game, rom);
            *rom = RomRecord::default();
        }
    }

    match 1 + paren_depth(rest) {
        depth if depth <= 0 => {
            *game = GameRecord::default();
            LineState::OutsideHeader
        }
        _ if rom_open => LineState::InsideRom,
        _ => LineState::InsideGame,
    }
}

/// Split `text` at each `rom (` outside quotes. The first part is what comes
/// before any rom block; every later part starts after a rom's `(`.
fn split_rom_blocks(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut prev_space = true;

    for (i, c) in text.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if !in_quotes
            && prev_space
            && let Some(("rom", after)) = block_open(&text[i..])
        {
            parts.push(&text[start..i]);
            start = text.len() - after.len();
        }
        prev_space = c.is_ascii_whitespace();
    }
    parts.push(&text[start..]);
    parts
}

/// Opening minus closing parentheses outside quoted strings.
fn paren_depth(text: &str) -> i32 {
    let mut depth = 0;
    let mut in_quotes = false;
    for c in text.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => depth -= 1,
            _ => {}
        }
    }
    depth
}

fn clrmamepro_header(text: &str) -> CatalogHeader {
    let mut header = CatalogHeader::default();
    let mut inside = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if !inside {
            match block_open(trimmed) {
                Some((keyword, _)) if is_game_block(keyword) => break,
                Some((_, rest)) if paren_depth(rest) < 0 => {
                    let tokens = tokenize(rest);
                    for pair in tokens.chunks_exact(2) {
                        header.apply(&pair[0], pair[1].clone());
                    }
                    break;
                }
                Some(_) => inside = true,
                None => {}
            }
            continue;
        }
        if trimmed == ")" {
            break;
        }
        if let Some((key, value)) = parse_kv(trimmed) {
            header.apply(key, value);
        }
    }

    header
}

fn is_game_block(keyword: &str) -> bool {
    matches!(keyword, "game" | "machine" | "resource")
}

/// Detect a block start like `clrmamepro (` or `rom ( name ...`, returning
/// the keyword and the text after the opening parenthesis.
fn block_open(line: &str) -> Option<(&str, &str)> {
    let end = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(line.len());
    let (keyword, rest) = line.split_at(end);
    if keyword.is_empty() {
        return None;
    }
    let rest = rest.trim_start().strip_prefix('(')?;
    Some((keyword, rest))
}

/// Parse a key-value line like `name "Some Value"` or `version 20240101`.
fn parse_kv(line: &str) -> Option<(&str, String)> {
    let (key, raw) = line.split_once(|c: char| c.is_ascii_whitespace())?;
    let raw = raw.trim();
    let value = match raw.strip_prefix('"') {
        Some(inner) => inner.split('"').next().unwrap_or(inner),
        None => raw,
    };
    Some((key, value.to_string()))
}

/// Collect rom attributes from one line. Within the line the first
/// occurrence of an attribute wins.
fn rom_attributes(text: &str) -> RomRecord {
    let tokens = tokenize(text);
    let mut rom = RomRecord::default();

    let mut i = 0;
    while i + 1 < tokens.len() {
        let value = &tokens[i + 1];
        match tokens[i].as_str() {
            "name" => {
                rom.name.get_or_insert_with(|| value.clone());
            }
            "size" => {
                rom.size.get_or_insert(value.parse().unwrap_or(0));
            }
            "crc" => {
                rom.crc32.get_or_insert_with(|| value.to_uppercase());
            }
            "md5" => {
                rom.md5.get_or_insert_with(|| value.to_lowercase());
            }
            "sha1" => {
                rom.sha1.get_or_insert_with(|| value.to_lowercase());
            }
            _ => {
                i += 1;
                continue;
            }
        }
        i += 2;
    }

    rom
}

/// Tokenize a line, respecting quoted strings.
/// `name "Game (Region).ext" size 12345 )` → ["name", "Game (Region).ext", "size", "12345", ")"]
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            chars.next();
        }

        let Some(&first) = chars.peek() else {
            break;
        };

        let mut token = String::new();
        if first == '"' {
            chars.next();
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                token.push(c);
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_ascii_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }
        tokens.push(token);
    }

    tokens
}

#[cfg(test)]
#[path = "tests/dat_tests.rs"]
mod tests;
