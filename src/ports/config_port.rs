//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    /// Comma-separated value split into trimmed, upper-cased, non-empty items.
    fn get_list(&self, section: &str, key: &str) -> Vec<String> {
        self.get_string(section, key)
            .map(|raw| parse_symbol_list(&raw))
            .unwrap_or_default()
    }
}

pub fn parse_symbol_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_symbol_list_trims_and_uppercases() {
        assert_eq!(
            parse_symbol_list(" iwm, SPY ,,qqq "),
            vec!["IWM".to_string(), "SPY".to_string(), "QQQ".to_string()]
        );
        assert!(parse_symbol_list("").is_empty());
    }
}
