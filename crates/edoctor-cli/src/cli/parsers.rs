pub(super) fn parse_field_assignment(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("field name must not be empty in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
