/// Splits a validator namespace such as `Struct.Items[2].Email` into wire
/// field names, dropping the root struct segment: `["items", "2", "email"]`.
pub fn split_namespace(namespace: &str) -> Vec<String> {
    segments(namespace).skip(1).map(to_field_name).collect()
}

/// Splits a field path that is already in wire form (`user.addresses[0].zipCode`)
/// on dots and indices, keeping every segment as given.
pub fn split_field(field: &str) -> Vec<String> {
    segments(field).map(|s| s.to_string()).collect()
}

/// Last segment of the namespace, the name used inside messages.
pub fn field_name(namespace: &str) -> String {
    segments(namespace).last().map(to_field_name).unwrap_or_default()
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(['.', '[', ']']).filter(|s| !s.is_empty())
}

/// Struct field names as they appear on the wire: `DiveTest` -> `dive_test`.
pub fn to_field_name(segment: &str) -> String {
    let chars: Vec<char> = segment.chars().collect();
    let mut name = String::with_capacity(segment.len() + 4);

    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).and_then(|p| chars.get(p));
            let next = chars.get(i + 1);
            let after_lower = prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
            let ends_acronym =
                prev.is_some_and(|p| p.is_uppercase()) && next.is_some_and(|n| n.is_lowercase());
            if after_lower || ends_acronym {
                name.push('_');
            }
            name.extend(c.to_lowercase());
        } else {
            name.push(*c);
        }
    }

    name
}
