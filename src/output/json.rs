//
//  releasehub-cli
//  output/json.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! JSON output for scripting and automation.
//!
//! Pretty-printed by default for readability; use [`write_json_compact`]
//! when piping into other tools.

use serde::Serialize;

/// Writes a value as pretty-printed JSON to stdout.
pub fn write_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a value as minified JSON to stdout.
pub fn write_json_compact<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn writes_serializable_values() {
        write_json(&json!({"ok": true})).unwrap();
        write_json_compact(&json!([1, 2, 3])).unwrap();
    }
}
