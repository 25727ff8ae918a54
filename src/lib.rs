//! # Hitcounter - Persisted Per-Key Hit Counters
//!
//! A Rust library providing the classic web "hit counter": every time a
//! page asks for its counter, the count for that page's key goes up by one
//! and comes back as a row of digit images.
//!
//! ```text
//!   {{ hitCounter "index" }}
//!            │
//!            ▼
//!   ┌──────────────────┐   increment    ┌──────────────┐   write   ┌──────────────────┐
//!   │    HitCounter    │ ─────────────► │ CounterStore │ ────────► │ hitcounters.json │
//!   │ (template func)  │ ◄───────────── │   (Ledger)   │           └──────────────────┘
//!   └──────────────────┘     1042       └──────────────┘
//!            │
//!            ▼ render(1042, pad 6, "green")
//!   <span title="Hit counter"><img alt="0">...<img alt="2"></span>
//! ```
//!
//! ## Design
//!
//! 1. **Shared ledger**: all counters in a process that persist to the same
//!    file share one in-memory mapping, guarded by a single lock.
//!
//! 2. **Seeded keys**: a key seen for the first time starts at the configured
//!    seed, so its first visible value is `seed + 1`.
//!
//! 3. **Persist on every hit**: the whole mapping is written after each
//!    increment, through a temporary file and an atomic rename. A failed
//!    write is reported to the caller; the in-memory count is kept.
//!
//! 4. **Total rendering**: unknown styles fall back to the default style, so
//!    once a count is known its markup can always be produced.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hitcounter::config::HitCounterConfig;
//! use hitcounter::function::HitCounter;
//!
//! let config: HitCounterConfig = r#"
//!     hitCounter {
//!         style odometer
//!         pad_digits 6
//!         initial_seed 1000
//!     }
//! "#
//! .parse()?;
//!
//! let counter = HitCounter::provision_at(config, "/var/lib/site/hitcounters.json");
//!
//! // Typed call
//! let html = counter.hit("index")?;
//!
//! // Or register with a template engine
//! let functions = counter.template_functions();
//! let html = functions["hitCounter"]("about")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`store`] | Shared, persisted key to count mapping |
//! | [`snapshot`] | JSON snapshot read/write |
//! | [`render`] | Count to digit-image markup |
//! | [`styles`] | Style name and digit to image asset |
//! | [`config`] | Counter settings and their parser |
//! | [`function`] | Template function adapter |
//! | [`observers`] | Optional table output (feature `table`) |
//!
//! ## Logging
//!
//! The crate logs through [`tracing`] and never installs a subscriber.
//! Unreadable snapshots and failed writes are reported at `warn` level.

pub mod config;
pub mod error;
pub mod function;
pub mod observers;
pub mod render;
pub mod snapshot;
pub mod store;
pub mod styles;

pub use config::HitCounterConfig;
pub use error::{HitCounterError, Result};
pub use function::HitCounter;
pub use store::CounterStore;
