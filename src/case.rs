//! Case conversion for model type names: snake_case, kebab-case or PascalCase in, camelCase / PascalCase out.

/// Convert an identifier to camelCase.
/// e.g. "user_profile" -> "userProfile", "UserProfile" -> "userProfile", "blog-post" -> "blogPost"
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            capitalize_next = !out.is_empty();
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else if out.is_empty() {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert an identifier to PascalCase.
/// e.g. "user_profile" -> "UserProfile", "user" -> "User"
pub fn to_pascal_case(s: &str) -> String {
    let camel = to_camel_case(s);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert an identifier from camelCase / PascalCase to snake_case.
/// e.g. "userProfile" -> "user_profile", "UserProfile" -> "user_profile".
/// Uppercase runs stay one word: "HTTPServer" -> "http_server", "userID" -> "user_id".
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let after_lower = prev.map_or(false, |p| p.is_lowercase() || p.is_ascii_digit());
            let ends_run = prev.map_or(false, char::is_uppercase) && next.map_or(false, char::is_lowercase);
            if (after_lower || ends_run) && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else if c == '-' {
            out.push('_');
        } else {
            out.push(c);
        }
    }
    out
}
