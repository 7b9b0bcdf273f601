//! basket-arl: market-basket recommendations from service purchase logs.
//!
//! Purchases are grouped into monthly per-customer baskets, frequent
//! co-purchased service sets are mined with Apriori, and the resulting
//! association rules are ranked by lift to recommend services that go
//! together with a queried one.
//!
//! # Quick Start
//!
//! ```
//! use basket_arl::prelude::*;
//!
//! let csv = "UserId,ServiceId,CategoryId,CreateDate\n\
//!            25446,4,5,2017-08-02 10:00:00\n\
//!            25446,48,5,2017-08-15 11:00:00\n\
//!            7,4,5,2017-09-01 09:30:00\n\
//!            7,48,5,2017-09-03 12:00:00\n\
//!            8,2,0,2017-09-03 12:00:00\n";
//! let log = TransactionLog::from_reader(csv.as_bytes()).unwrap();
//!
//! let table = IncidenceTable::from_transactions(&log);
//! assert_eq!(table.n_baskets(), 3);
//!
//! let rules = Apriori::new().with_min_support(0.5).mine(&table).unwrap();
//! let recommender = Recommender::new(rules);
//! assert_eq!(recommender.recommend("4_5", 1), vec![ItemKey::from("48_5")]);
//! ```
//!
//! # Modules
//!
//! - [`data`]: Transaction log loading (CSV)
//! - [`basket`]: Item keys, basket keys and the incidence table
//! - [`mining`]: Apriori frequent itemsets and association rules
//! - [`recommend`]: Lift-ranked recommendations
//! - [`config`]: JSON run configuration
//! - [`pipeline`]: End-to-end run and report

pub mod basket;
pub mod config;
pub mod data;
pub mod error;
pub mod mining;
pub mod pipeline;
pub mod prelude;
pub mod recommend;
pub mod traits;

pub use error::{BasketError, Result};
