//! # seqmap - ordered associative collections
//!
//! An insertion-ordered key→value collection with a rich functional
//! operation surface: slicing, searching, grouping, mapping, folding,
//! sorting, merging, nested-path access and sliding windows.
//!
//! Keys are integers or strings; values are dynamic ([`Value`]) and can
//! nest collections and records arbitrarily deep.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                        seqmap                          │
//! ├────────────────────────────────────────────────────────┤
//! │                                                        │
//! │  CORE (pure data model)                                │
//! │    Key, Value, Record, SortMode, Error                 │
//! │                                                        │
//! │  OPS (free-function algorithms over the raw map)       │
//! │    take/drop, find, group, map, fold, sort, merge, ... │
//! │                                                        │
//! │  SURFACE (what callers touch)                          │
//! │    Collection - the main entry point                   │
//! │    Path      - dotted nested access                    │
//! │    Windows   - sliding-window iteration                │
//! │                                                        │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use seqmap::{coll, SortMode, Value};
//!
//! let mut scores = coll! {"ada" => 3, "bob" => 1, "cy" => 2};
//! scores.put("dee", 5);
//!
//! assert_eq!(scores.get("bob"), Ok(&Value::Int(1)));
//! assert_eq!(scores.max(), Ok(&Value::Int(5)));
//!
//! let ranked = scores.sorted(true, SortMode::Numeric);
//! assert_eq!(ranked.keys().join(", "), "bob, cy, ada, dee");
//!
//! // Nested paths
//! let config = coll! {"db" => coll! {"host" => "localhost", "port" => 5432}};
//! assert_eq!(config.get_nested("db.port"), Some(&Value::Int(5432)));
//!
//! // Sliding windows
//! let windows: Vec<String> = coll![1, 2, 3, 4]
//!     .sliding(2)
//!     .unwrap()
//!     .map(|w| w.to_string())
//!     .collect();
//! assert_eq!(windows, vec!["[1, 2]", "[2, 3]", "[3, 4]"]);
//! ```

pub mod access;
pub mod collection;
pub mod core;
pub mod ops;
pub mod path;
pub mod windows;

pub use access::AccessStrategy;
pub use collection::Collection;
pub use core::{Error, Key, RawMap, Record, Result, SortMode, Value};
pub use path::Path;
pub use windows::Windows;
