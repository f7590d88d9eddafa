//! Shareable links carrying a rule id and a seed model.
//!
//! A link looks like `<base>?ruleId=1385&dm=C%2C000`. Anything invalid in a
//! received link quietly falls back to the defaults.

use std::sync::OnceLock;

use regex::Regex;

use crate::{
    enc::{Base64Model, ModelCodec},
    grid::Grid,
    rule::RuleId,
};

pub const RULE_PARAM: &str = "ruleId";
pub const MODEL_PARAM: &str = "dm";

/// Builds a link for `rule`, embedding `model` when given
pub fn share_url(base: &str, rule: RuleId, model: Option<&Grid>) -> String {
    let mut url = format!("{}?{}={}", base, RULE_PARAM, rule);
    if let Some(model) = model {
        url.push_str(&format!("&{}={}", MODEL_PARAM, escape(&Base64Model.encode(model))));
    }
    url
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '+' => escaped.push_str("%2B"),
            '/' => escaped.push_str("%2F"),
            ',' => escaped.push_str("%2C"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn unescape(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let decoded = match bytes[i] {
            b'%' => bytes
                .get(i + 1..i + 3)
                .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                .and_then(|hex| std::str::from_utf8(hex).ok())
                .and_then(|hex| u8::from_str_radix(hex, 16).ok()),
            _ => None,
        };
        match decoded {
            Some(byte) => {
                out.push(byte);
                i += 3;
            }
            None => {
                // query strings encode spaces as '+', keep that reading
                out.push(if bytes[i] == b'+' { b' ' } else { bytes[i] });
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// The raw parameters of a received link
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareParams {
    pub rule_id: Option<String>,
    pub model: Option<String>,
}

impl ShareParams {
    /// Reads the query part of a full link, the part after `?` and before `#`
    pub fn from_url(url: &str) -> Self {
        let query = url.split_once('?').map(|(_, q)| q).unwrap_or("");
        let query = query.split('#').next().unwrap_or("");
        Self::from_query(query)
    }

    /// Reads `key=value` pairs separated by `&`, the first occurrence wins
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let slot = match unescape(key).as_str() {
                RULE_PARAM => &mut params.rule_id,
                MODEL_PARAM => &mut params.model,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(unescape(value));
            }
        }
        params
    }

    pub fn rule(&self) -> Option<RuleId> {
        let raw = self.rule_id.as_deref()?;
        match raw.parse() {
            Ok(rule) => Some(rule),
            Err(err) => {
                log::warn!("ignoring {}: {}", RULE_PARAM, err);
                None
            }
        }
    }

    /// The linked rule, or the default rule when absent or invalid
    pub fn rule_or_default(&self) -> RuleId {
        self.rule().unwrap_or_default()
    }

    pub fn model(&self) -> Option<Grid> {
        static GRAMMAR: OnceLock<Regex> = OnceLock::new();
        let grammar =
            GRAMMAR.get_or_init(|| Regex::new(r"^[0-9a-zA-Z/+]*(,[01]+)?$").expect("valid regex"));

        // an unescaped '+' arrives as a space
        let raw = self.model.as_deref()?.replace(' ', "+");
        if raw.is_empty() || !grammar.is_match(&raw) {
            log::warn!("ignoring {}: {:?} is not an encoded model", MODEL_PARAM, raw);
            return None;
        }
        match Base64Model.decode(&raw) {
            Ok(grid) => Some(grid),
            Err(err) => {
                log::warn!("ignoring {}: {}", MODEL_PARAM, err);
                None
            }
        }
    }

    /// The linked model, or the 3x3 seed when absent or invalid
    pub fn model_or_default(&self) -> Grid {
        self.model().unwrap_or_else(Grid::seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_links() {
        assert_eq!(
            share_url("fca.html", RuleId::new(42), None),
            "fca.html?ruleId=42"
        );
        assert_eq!(
            share_url("fca.html", RuleId::DEFAULT, Some(&Grid::seed())),
            "fca.html?ruleId=1385&dm=C%2C000"
        );
    }

    #[test]
    fn escapes_base64_symbols() {
        let framed: Grid = "111111\n100001\n101101\n101101\n100001\n111111"
            .parse()
            .expect("valid grid");
        let url = share_url("x", RuleId::new(1), Some(&framed));

        assert_eq!(url, "x?ruleId=1&dm=%2Fhtth%2F");
        assert_eq!(ShareParams::from_url(&url).model(), Some(framed));
    }

    #[test]
    fn reads_links_back() {
        let url = share_url("https://host/fca/", RuleId::new(77), Some(&Grid::seed()));
        let params = ShareParams::from_url(&url);

        assert_eq!(params.rule_or_default(), RuleId::new(77));
        assert_eq!(params.model_or_default(), Grid::seed());
    }

    #[test]
    fn missing_params_use_defaults() {
        let params = ShareParams::from_url("https://host/fca/");

        assert_eq!(params, ShareParams::default());
        assert_eq!(params.rule_or_default(), RuleId::DEFAULT);
        assert_eq!(params.model_or_default(), Grid::seed());
    }

    #[test]
    fn invalid_params_use_defaults() {
        for query in ["ruleId=65536", "ruleId=-3", "ruleId=12x", "ruleId="] {
            assert_eq!(
                ShareParams::from_query(query).rule_or_default(),
                RuleId::DEFAULT,
                "{query}"
            );
        }
        for query in ["dm=A", "dm=C,0002", "dm=C-,000", "dm=", "dm=%2C10101"] {
            assert_eq!(
                ShareParams::from_query(query).model_or_default(),
                Grid::seed(),
                "{query}"
            );
        }
    }

    #[test]
    fn unescaped_links_still_work() {
        // 2x2 all alive is ",1111"; 6x6 with a '+' symbol sent raw
        let params = ShareParams::from_query("dm=,1111&ruleId=9");
        assert_eq!(params.model().map(|g| g.alive_count()), Some(4));
        assert_eq!(params.rule(), Some(RuleId::new(9)));

        let plus: Grid = "111110\n000000\n000000\n000000\n000000\n000000"
            .parse()
            .expect("valid grid");
        assert_eq!(Base64Model.encode(&plus), "+AAAAA");
        assert_eq!(ShareParams::from_query("dm=+AAAAA").model(), Some(plus));
    }

    #[test]
    fn ignores_fragment_and_unknown_keys() {
        let params = ShareParams::from_url("page?foo=1&ruleId=5&ruleId=6#dm=C%2C000");

        assert_eq!(params.rule_id.as_deref(), Some("5"));
        assert_eq!(params.model, None);
    }
}
