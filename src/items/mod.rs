mod calculation;

pub use calculation::CalculationResult;
