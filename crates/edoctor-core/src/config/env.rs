#[must_use]
pub(super) fn read_non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[must_use]
pub(super) fn read_env_u64(name: &str) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
}

#[must_use]
pub(super) fn parse_positive_u64(raw: Option<u64>, default_value: u64) -> u64 {
    raw.filter(|value| *value > 0).unwrap_or(default_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_positive_u64_rejects_zero() {
        assert_eq!(parse_positive_u64(Some(0), 10), 10);
        assert_eq!(parse_positive_u64(None, 10), 10);
        assert_eq!(parse_positive_u64(Some(250), 10), 250);
    }
}
