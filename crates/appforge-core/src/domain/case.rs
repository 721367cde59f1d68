//! Case transforms used everywhere a name is emitted.
//!
//! Every file path, type name and field name in a generated tree goes through
//! one of these functions, both directly (path computation in the generators)
//! and indirectly (the template helpers registered by the adapters). Keeping a
//! single implementation is what keeps `OrderItem.ts` and
//! `import { OrderItem } from './models/OrderItem'` in agreement.
//!
//! All functions are total: the empty string maps to the empty string.
//!
//! | Input            | camel         | pascal        | snake            |
//! |------------------|---------------|---------------|------------------|
//! | `order_item`     | `orderItem`   | `OrderItem`   | `order_item`     |
//! | `unit-price`     | `unitPrice`   | `UnitPrice`   | `unit_price`     |
//! | `UserProfile`    | `userProfile` | `UserProfile` | `user_profile`   |
//! | `Acme App`       | `acmeApp`     | `AcmeApp`     | `acme_app`       |

/// Split into segments on `-`, `_`, whitespace and before every uppercase
/// letter. Segments keep their original casing.
fn segments(input: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, c) in input.char_indices() {
        if c == '-' || c == '_' || c.is_whitespace() {
            if let Some(s) = start.take() {
                out.push(&input[s..idx]);
            }
            continue;
        }

        if c.is_uppercase() {
            if let Some(s) = start {
                out.push(&input[s..idx]);
            }
            start = Some(idx);
            continue;
        }

        if start.is_none() {
            start = Some(idx);
        }
    }

    if let Some(s) = start {
        out.push(&input[s..]);
    }

    out
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn decapitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `order_item` → `orderItem`.
pub fn camel(input: &str) -> String {
    let mut parts = segments(input).into_iter();
    let mut out = match parts.next() {
        Some(first) => decapitalize(first),
        None => return String::new(),
    };
    for part in parts {
        out.push_str(&capitalize(part));
    }
    out
}

/// `order_item` → `OrderItem`.
pub fn pascal(input: &str) -> String {
    segments(input).into_iter().map(capitalize).collect()
}

/// `OrderItem` → `order_item`.
pub fn snake(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev: Option<char> = None;

    for c in input.chars() {
        let c = if c == '-' || c.is_whitespace() { '_' } else { c };
        if c.is_uppercase() && prev.is_some_and(|p| p != '_') {
            out.push('_');
        }
        out.extend(c.to_lowercase());
        prev = Some(c);
    }

    out.trim_start_matches('_').to_string()
}

/// `OrderItem` → `order-item`. Used for package and archive names.
pub fn kebab(input: &str) -> String {
    snake(input).replace('_', "-")
}

pub fn upper(input: &str) -> String {
    input.to_uppercase()
}

pub fn lower(input: &str) -> String {
    input.to_lowercase()
}

/// `true` when `name` is usable as an identifier in every target language:
/// ASCII letter or `_` first, then ASCII alphanumerics or `_`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
