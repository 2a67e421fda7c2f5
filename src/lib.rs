//! # Room Schedules
//!
//! Builds department schedules for the rooms of a building model.
//!
//! ## Features
//!
//! - One itemized schedule per distinct department, filtered to that department,
//!   grouped by level and sorted by name, with area totals and a room count
//! - One "All Departments" rollup with the total area per department
//! - Everything created in a single transaction: all schedules or none
//! - Works against any document that implements [`host::Host`]; an in-memory
//!   document loaded from JSON is included
//! - Export of the created schedules to CSV and JSON
//!
//! ## Example
//!
//! ```no_run
//! use room_schedules::builder::ScheduleBuilder;
//! use room_schedules::host::load_document;
//!
//! let mut document = load_document("office.json").expect("Failed to load");
//! let summary = ScheduleBuilder::default().run(&mut document).expect("Failed to build");
//! println!("{summary}");
//! ```

pub mod builder;
pub mod error;
pub mod export;
pub mod host;
pub mod model;
