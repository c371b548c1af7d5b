/// Lowercases the first character only ("Admin" -> "admin").
pub fn lcfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::lcfirst;

    #[test]
    fn lcfirst_touches_first_char_only() {
        assert_eq!(lcfirst("Public Dir"), "public Dir");
        assert_eq!(lcfirst(""), "");
        assert_eq!(lcfirst("/var/www"), "/var/www");
    }
}
