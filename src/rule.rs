use std::{fmt, str::FromStr, sync::OnceLock};

use regex::Regex;

use crate::error::RuleIdError;

/// Number of inputs every child cell reads from its parent's neighbourhood
pub const INPUTS: u32 = 4;
/// The number of permutations for a 4-bit neighbourhood pattern
pub const PATTERNS: usize = 1 << INPUTS;

/// Creates the general lookup table for a rule id over `inputs`-bit patterns
///
/// Entry `i` is bit `i` of `rule_id`, bit 0 being the least significant one.
/// Patterns past the 32 bits of the id are always dead.
pub fn lookup_table(rule_id: u32, inputs: u32) -> Vec<bool> {
    let lines = 1usize << inputs;
    (0..lines)
        .map(|i| i < u32::BITS as usize && rule_id & (1 << i) != 0)
        .collect()
}

/// Formats a pattern index as its zero-padded binary key, most significant
/// input first
pub fn pattern_key(pattern: usize, inputs: u32) -> String {
    format!("{:0width$b}", pattern, width = inputs as usize)
}

/// A rule id the rest of the explorer accepts, `[0, 2^16)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u16);
impl RuleId {
    pub const DEFAULT: Self = Self(1385);

    #[inline]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }
    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn table(self) -> RuleTable {
        RuleTable::new(self.0 as u32)
    }
}
impl Default for RuleId {
    fn default() -> Self {
        Self::DEFAULT
    }
}
impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl FromStr for RuleId {
    type Err = RuleIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static DIGITS: OnceLock<Regex> = OnceLock::new();
        let digits = DIGITS.get_or_init(|| Regex::new(r"^[0-9]+$").expect("valid regex"));
        if !digits.is_match(s) {
            return Err(RuleIdError::NotNumeric(s.to_owned()));
        }
        // overflowing u16 is exactly the `>= 2^16` range check
        s.parse::<u16>()
            .map(Self)
            .map_err(|_| RuleIdError::OutOfRange(s.to_owned()))
    }
}

/// The 16 entry table mapping a child's 4-bit input pattern to its next state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleTable {
    rule_id: u32,
    outputs: [bool; PATTERNS],
}
impl RuleTable {
    pub fn new(rule_id: u32) -> Self {
        let mut outputs = [false; PATTERNS];
        for (out, bit) in outputs.iter_mut().zip(lookup_table(rule_id, INPUTS)) {
            *out = bit;
        }
        Self { rule_id, outputs }
    }

    #[inline]
    pub fn rule_id(&self) -> u32 {
        self.rule_id
    }

    /// Output for the pattern whose first input is the most significant bit
    #[inline]
    pub fn output(&self, pattern: usize) -> bool {
        self.outputs[pattern & (PATTERNS - 1)]
    }

    /// Looks up a string key such as `"0110"`
    pub fn lookup(&self, key: &str) -> Option<bool> {
        if key.len() != INPUTS as usize || !key.bytes().all(|b| b == b'0' || b == b'1') {
            return None;
        }
        usize::from_str_radix(key, 2).ok().map(|i| self.outputs[i])
    }

    /// All `(key, output)` pairs in ascending pattern order
    pub fn entries(&self) -> impl Iterator<Item = (String, bool)> + '_ {
        self.outputs
            .iter()
            .enumerate()
            .map(|(i, &out)| (pattern_key(i, INPUTS), out))
    }
}
impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, out) in self.entries() {
            writeln!(f, "{} -> {}", key, out as u8)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_170_alternates() {
        let table = RuleTable::new(170);

        let expected = [
            ("0000", false),
            ("0001", true),
            ("0010", false),
            ("0011", true),
            ("0100", false),
            ("0101", true),
            ("0110", false),
            ("0111", true),
        ];
        for (key, out) in expected {
            assert_eq!(table.lookup(key), Some(out), "key {key}");
        }
        // 170 only has 8 significant bits
        assert!((8..PATTERNS).all(|i| !table.output(i)));
    }

    #[test]
    fn every_rule_is_total() {
        for id in (0..=u16::MAX as u32).step_by(97) {
            let table = RuleTable::new(id);
            assert_eq!(table.entries().count(), PATTERNS);

            let rebuilt = (0..PATTERNS)
                .filter(|&i| table.output(i))
                .fold(0u32, |acc, i| acc | 1 << i);
            assert_eq!(rebuilt, id);
        }
    }

    #[test]
    fn default_rule_bits() {
        let table = RuleId::DEFAULT.table();

        // 1385 = 0b101_0110_1001
        let alive: Vec<usize> = (0..PATTERNS).filter(|&i| table.output(i)).collect();
        assert_eq!(alive, vec![0, 3, 5, 6, 8, 10]);
    }

    #[test]
    fn high_bits_are_ignored() {
        assert_eq!(RuleTable::new(0x1_0005).outputs, RuleTable::new(5).outputs);
    }

    #[test]
    fn wide_tables_pad_with_dead() {
        let table = lookup_table(u32::MAX, 6);

        assert_eq!(table.len(), 64);
        assert!(table[..32].iter().all(|&b| b));
        assert!(table[32..].iter().all(|&b| !b));
    }

    #[test]
    fn lookup_rejects_bad_keys() {
        let table = RuleTable::new(0xffff);

        assert_eq!(table.lookup("111"), None);
        assert_eq!(table.lookup("10a1"), None);
        assert_eq!(table.lookup("+101"), None);
    }

    #[test]
    fn pattern_keys_are_padded() {
        assert_eq!(pattern_key(3, 4), "0011");
        assert_eq!(pattern_key(0, 4), "0000");
    }

    #[test]
    fn parses_rule_ids() {
        assert_eq!("0".parse::<RuleId>(), Ok(RuleId::new(0)));
        assert_eq!("65535".parse::<RuleId>(), Ok(RuleId::new(u16::MAX)));
        assert_eq!(
            "65536".parse::<RuleId>(),
            Err(RuleIdError::OutOfRange("65536".into()))
        );
        assert!(matches!("-1".parse::<RuleId>(), Err(RuleIdError::NotNumeric(_))));
        assert!(matches!("12a".parse::<RuleId>(), Err(RuleIdError::NotNumeric(_))));
        assert!(matches!("".parse::<RuleId>(), Err(RuleIdError::NotNumeric(_))));
    }
}
