use std::sync::OnceLock;

use regex::Regex;

use crate::{
    error::{DecodeError, GridError},
    grid::Grid,
};

/// Converts whole models to and from text
pub trait ModelCodec {
    fn encode(&self, grid: &Grid) -> String;
    fn decode(&self, value: &str) -> Result<Grid, DecodeError>;
}

/// The 64 symbols of a run, indexed by the 6-bit group they stand for
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const GROUP_BITS: usize = 6;

fn symbol_value(symbol: u8) -> Option<u8> {
    match symbol {
        b'A'..=b'Z' => Some(symbol - b'A'),
        b'a'..=b'z' => Some(symbol - b'a' + 26),
        b'0'..=b'9' => Some(symbol - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

/// The compact model string shared in URLs
///
/// Row-major bits are packed six at a time into base64 symbols. The 1 to 5
/// bits left over are appended verbatim after a comma:
///
/// ```text
/// 000
/// 010  ->  000010 000  ->  "C,000"
/// 000
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Model;

impl ModelCodec for Base64Model {
    fn encode(&self, grid: &Grid) -> String {
        let groups = grid.bits().chunks(GROUP_BITS);
        let mut encoded = String::with_capacity(groups.len() + GROUP_BITS);
        for group in groups {
            if group.len() == GROUP_BITS {
                let value = group.iter().fold(0, |acc, &b| (acc << 1) | b as usize);
                encoded.push(ALPHABET[value] as char);
            } else {
                encoded.push(',');
                encoded.extend(group.iter().map(|&b| if b { '1' } else { '0' }));
            }
        }
        encoded
    }

    fn decode(&self, value: &str) -> Result<Grid, DecodeError> {
        let (run, suffix) = value.split_once(',').unwrap_or((value, ""));

        let mut bits = Vec::with_capacity(run.len() * GROUP_BITS + suffix.len());
        for (offset, symbol) in run.char_indices() {
            let group = u8::try_from(symbol)
                .ok()
                .and_then(symbol_value)
                .ok_or(DecodeError::InvalidSymbol { symbol, offset })?;
            bits.extend((0..GROUP_BITS).rev().map(|i| group & (1 << i) != 0));
        }
        for (offset, found) in suffix.char_indices() {
            bits.push(match found {
                '0' => false,
                '1' => true,
                _ => return Err(DecodeError::InvalidBit { found, offset }),
            });
        }

        if bits.is_empty() {
            return Err(DecodeError::Empty);
        }
        let size = bits.len().isqrt();
        if size * size != bits.len() {
            return Err(DecodeError::NotSquare(bits.len()));
        }
        Ok(Grid::from_bits(size, bits)?)
    }
}

/// Newline-delimited `0` and `1` lines, the editor's text format
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl ModelCodec for PlainText {
    fn encode(&self, grid: &Grid) -> String {
        format!("{}\n", grid)
    }

    fn decode(&self, value: &str) -> Result<Grid, DecodeError> {
        Ok(value.trim_end().parse::<Grid>()?)
    }
}

struct RunEncoder {
    sequence: String,
    line_len: usize,
    max_line_len: usize,
}
impl RunEncoder {
    fn new(max_line_len: usize) -> Self {
        Self {
            sequence: String::new(),
            line_len: 0,
            max_line_len,
        }
    }

    fn push_run(&mut self, run: usize, c: char) {
        let append = match run {
            0 => return,
            1 => c.to_string(),
            n => format!("{}{}", n, c),
        };
        if self.line_len + append.len() > self.max_line_len {
            self.sequence.push('\n');
            self.line_len = 0;
        }
        self.line_len += append.len();
        self.sequence.push_str(&append);
    }

    fn end(mut self) -> String {
        self.sequence.push('!');
        self.sequence
    }
}

/// Largest side length a run-length pattern may decode to
pub const MAX_RLE_SIZE: usize = 1 << 12;

fn advance(at: usize, run: usize) -> Result<usize, DecodeError> {
    at.checked_add(run)
        .filter(|&end| end <= MAX_RLE_SIZE)
        .ok_or_else(|| DecodeError::Malformed(format!("pattern exceeds {} cells", MAX_RLE_SIZE)))
}

fn header_extent(digits: &str) -> Result<usize, DecodeError> {
    digits
        .parse::<usize>()
        .ok()
        .filter(|&extent| extent <= MAX_RLE_SIZE)
        .ok_or_else(|| DecodeError::Malformed(format!("header extent {}", digits)))
}

/// Life-style run-length encoding, for handing a model to other automaton tools
///
/// Trailing dead cells of a row and trailing empty rows are not written, so
/// decoding pads the pattern's bounding box back into a square.
pub struct RunLengthEncoded {
    name: Option<String>,
    rule_id: Option<u16>,
    header: bool,
}
impl RunLengthEncoded {
    pub fn set_name<T: AsRef<str>>(mut self, name: T) -> Self {
        self.name = Some(name.as_ref().to_owned());
        self
    }
    pub fn set_rule(mut self, rule_id: u16) -> Self {
        self.rule_id = Some(rule_id);
        self
    }
    pub fn without_header(mut self) -> Self {
        self.header = false;
        self
    }

    fn encode_header(&self, grid: &Grid) -> String {
        let mut header = String::new();
        if !self.header {
            return header;
        }
        if let Some(name) = &self.name {
            header.push_str(&format!("#N {}\n", name));
        }
        header.push_str(&format!("x = {0}, y = {0}", grid.size()));
        if let Some(rule_id) = self.rule_id {
            header.push_str(&format!(", rule = fca/{}", rule_id));
        }
        header.push('\n');
        header
    }

    fn encode_cells(&self, grid: &Grid) -> String {
        let mut seq = RunEncoder::new(70);
        let mut empty_lines = 0;
        for (y, row) in grid.rows().enumerate() {
            let Some(last_alive) = row.iter().rposition(|&c| c) else {
                empty_lines += 1;
                continue;
            };
            // NOTE: line breaks go out before the row they lead to
            if y > empty_lines {
                seq.push_run(empty_lines + 1, '$');
            } else {
                seq.push_run(empty_lines, '$');
            }
            empty_lines = 0;

            let mut run = 0;
            let mut state = row[0];
            for &cell in &row[..=last_alive] {
                if cell != state {
                    seq.push_run(run, if state { 'o' } else { 'b' });
                    run = 0;
                    state = cell;
                }
                run += 1;
            }
            seq.push_run(run, 'o');
        }
        seq.end()
    }
}
impl Default for RunLengthEncoded {
    fn default() -> Self {
        Self {
            name: None,
            rule_id: None,
            header: true,
        }
    }
}

impl ModelCodec for RunLengthEncoded {
    fn encode(&self, grid: &Grid) -> String {
        format!("{}{}\n", self.encode_header(grid), self.encode_cells(grid))
    }

    fn decode(&self, value: &str) -> Result<Grid, DecodeError> {
        static TOKEN: OnceLock<Regex> = OnceLock::new();
        static HEADER: OnceLock<Regex> = OnceLock::new();
        let token = TOKEN.get_or_init(|| Regex::new(r"(\d*)([bo$!])").expect("valid regex"));
        let header = HEADER.get_or_init(|| {
            Regex::new(r"^\s*x\s*=\s*(\d+)\s*,\s*y\s*=\s*(\d+)").expect("valid regex")
        });

        let mut alive = Vec::new();
        let (mut x, mut y) = (0usize, 0usize);
        let mut extent = (0usize, 0usize);
        let mut ended = false;
        'lines_loop: for mut line in value.lines() {
            if let Some(i) = line.find('#') {
                line = &line[..i];
            }
            if let Some(caps) = header.captures(line) {
                extent.0 = extent.0.max(header_extent(&caps[1])?);
                extent.1 = extent.1.max(header_extent(&caps[2])?);
                continue;
            }

            for (_, [run_str, state]) in token.captures_iter(line).map(|c| c.extract()) {
                let run = match run_str {
                    "" => 1,
                    digits => digits
                        .parse::<usize>()
                        .map_err(|_| DecodeError::Malformed(format!("run {:?}", digits)))?,
                };
                match state {
                    "!" => {
                        ended = true;
                        break 'lines_loop;
                    }
                    "o" => {
                        let end = advance(x, run)?;
                        alive.extend((x..end).map(|x| (x, y)));
                        x = end;
                    }
                    "b" => x = advance(x, run)?,
                    "$" => {
                        x = 0;
                        y = advance(y, run)?;
                    }
                    _ => unreachable!(),
                }
                extent.0 = extent.0.max(x);
            }
        }
        if !ended {
            return Err(DecodeError::Malformed("missing terminating '!'".to_owned()));
        }

        let rows = alive.iter().map(|&(_, y)| y + 1).max().unwrap_or(0);
        let size = extent.0.max(extent.1).max(rows);
        if size == 0 {
            return Err(GridError::Empty.into());
        }
        if size > MAX_RLE_SIZE || size.checked_mul(size).is_none() {
            return Err(DecodeError::Malformed(format!("pattern exceeds {} cells", MAX_RLE_SIZE)));
        }
        let mut grid = Grid::new(size);
        for (x, y) in alive {
            grid.set(x, y, true);
        }
        Ok(grid)
    }
}
