//! Decoding URL values without a declared type.
//!
//! Run with: cargo run --example dynamic_values

use std::error::Error;
use urlvalues::{marshal, unmarshal, UrlValues, Value, ValueMap};

fn main() -> Result<(), Box<dyn Error>> {
    let values = UrlValues::parse(
        "enabled=true&limit=25&z=(1%2B2i)&at=2021-02-18T09%3A56%3A00Z&name=bob&id=1&id=2",
    );

    let mut map = ValueMap::new();
    unmarshal(&values, &mut map)?;

    for (key, value) in &map {
        let kind = match value {
            Value::Bool(_) => "boolean",
            Value::Float64(_) => "number",
            Value::Complex64(_) => "complex",
            Value::Time(_) => "timestamp",
            Value::Seq(_) => "list",
            _ => "text",
        };
        println!("{:>8} = {:<24} ({})", key, value.to_string(), kind);
    }

    // Maps marshal back, one value per list element
    map.insert("extra".to_string(), Value::from("added"));
    println!("\nRe-encoded: {}", marshal(&map)?.encode());

    Ok(())
}
