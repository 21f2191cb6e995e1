//! Declaring a record and round-tripping it through a query string.
//!
//! Run with: cargo run --example simple

use chrono::{DateTime, Utc};
use std::error::Error;
use urlvalues::{from_str, to_string, url_record};

url_record! {
    #[derive(Clone, Debug, Default, PartialEq)]
    struct Search {
        #[url = "q"]
        pub query: String,
        #[url = "tags,join=','"]
        pub tags: Vec<String>,
        #[url = "since,omitempty"]
        #[urlformat = "%Y-%m-%d"]
        pub since: Option<DateTime<Utc>>,
        #[url = "strict"]
        #[urlformat = "int"]
        pub strict: bool,
        #[url = "page,omitempty"]
        pub page: u32,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let search = Search {
        query: "tag codec".to_string(),
        tags: vec!["rust".to_string(), "url".to_string()],
        since: None,
        strict: true,
        page: 2,
    };

    // Marshal to a query string
    let query = to_string(&search)?;
    println!("Query string: {}", query);

    // And back
    let search_back: Search = from_str(&query)?;
    assert_eq!(search, search_back);
    println!("✓ Round-trip successful");

    Ok(())
}
