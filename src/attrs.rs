// Mapping of host attributes and JS option keys onto config attribute names.

use crate::constants::{DATA_PREFIX, MOUNT_ATTRIBUTE, MOUSE_CONTAINER_ATTRIBUTE};

/// `displacementScale` -> `displacement-scale`; kebab-case passes through.
pub fn camel_to_kebab(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else if ch == '_' {
            out.push('-');
        } else {
            out.push(ch);
        }
    }
    out
}

/// Config key for a host attribute, or `None` for attributes that are not
/// panel configuration (non-`data-*`, the mount marker, the container
/// selector).
pub fn config_key(attribute: &str) -> Option<&str> {
    if attribute == MOUNT_ATTRIBUTE {
        return None;
    }
    let key = attribute.strip_prefix(DATA_PREFIX)?;
    if key == MOUSE_CONTAINER_ATTRIBUTE || key.is_empty() {
        return None;
    }
    Some(key)
}
