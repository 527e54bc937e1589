pub mod calculator;

pub use calculator::{render_calculation, render_json, render_list};
