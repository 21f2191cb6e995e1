//! Taking over a type's encoding by implementing the capability traits.
//!
//! Run with: cargo run --example custom_hooks

use std::error::Error as StdError;
use urlvalues::{marshal, unmarshal, Error, MarshalValues, UnmarshalValues, UrlValues};

/// A bounding box sent as a single `bbox=x1,y1,x2,y2` parameter.
#[derive(Debug, Default, PartialEq)]
struct BoundingBox {
    min: (f64, f64),
    max: (f64, f64),
}

impl MarshalValues for BoundingBox {
    fn marshal_values(&self) -> urlvalues::Result<UrlValues> {
        let mut values = UrlValues::new();
        values.set(
            "bbox",
            format!("{},{},{},{}", self.min.0, self.min.1, self.max.0, self.max.1),
        );
        Ok(values)
    }
}

impl UnmarshalValues for BoundingBox {
    fn unmarshal_values(&mut self, values: &UrlValues) -> urlvalues::Result<()> {
        let text = values
            .get("bbox")
            .ok_or_else(|| Error::custom("missing bbox parameter"))?;
        let coords = text
            .split(',')
            .map(|part| part.trim().parse::<f64>().map_err(Error::custom))
            .collect::<urlvalues::Result<Vec<_>>>()?;
        let &[x1, y1, x2, y2] = coords.as_slice() else {
            return Err(Error::custom("bbox needs exactly four coordinates"));
        };
        *self = BoundingBox {
            min: (x1, y1),
            max: (x2, y2),
        };
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn StdError>> {
    let bbox = BoundingBox {
        min: (-1.5, 2.0),
        max: (3.25, 4.0),
    };

    let values = marshal(&bbox)?;
    println!("Encoded: {}", values.encode());

    let mut back = BoundingBox::default();
    unmarshal(&values, &mut back)?;
    assert_eq!(back, bbox);
    println!("✓ Round-trip successful");

    let broken = UrlValues::parse("bbox=1,2,3");
    let err = unmarshal(&broken, &mut back).unwrap_err();
    println!("Rejected: {}", err);

    Ok(())
}
