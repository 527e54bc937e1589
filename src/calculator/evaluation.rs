//! Expression evaluation.
//!
//! Wraps the parser and the value arithmetic behind a simple interface:
//! hand in an expression, get back the text to show next to it. Every
//! failure collapses into [`ERROR_RESULT`].

use std::f64::consts;

use super::error::EvalError;
use super::format::{FormatOptions, format_value};
use super::parser::{Expr, parse};
use super::value::{Complex, Matrix, Value, apply_binary};

/// Display text for any expression that cannot be evaluated.
pub const ERROR_RESULT: &str = "Error";

/// Evaluates expressions with a fixed set of formatting options.
#[derive(Clone, Debug, Default)]
pub struct Calculator {
    options: FormatOptions,
}

impl Calculator {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Evaluate an expression and format the result for display.
    ///
    /// Never fails: anything that goes wrong yields `"Error"`.
    pub fn evaluate(&self, input: &str) -> String {
        match try_evaluate(input) {
            Ok(value) => format_value(&value, &self.options),
            Err(e) => {
                tracing::debug!("Failed to evaluate {:?}: {}", input.trim(), e);
                ERROR_RESULT.to_string()
            }
        }
    }
}

/// Evaluate an expression with the default formatting options.
pub fn evaluate_expression(input: &str) -> String {
    Calculator::default().evaluate(input)
}

/// Parse and evaluate an expression, keeping the reason for any failure.
pub fn try_evaluate(input: &str) -> Result<Value, EvalError> {
    let expr = parse(input.trim())?;
    let value = eval(&expr)?;

    if !value.is_finite() {
        return Err(EvalError::NonFinite);
    }
    Ok(value)
}

fn eval(expr: &Expr) -> Result<Value, EvalError> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Symbol(name) => constant(name),
        Expr::Neg(inner) => Ok(eval(inner)?.negate()),
        Expr::Binary { op, lhs, rhs } => apply_binary(*op, eval(lhs)?, eval(rhs)?),
        Expr::Call { name, args } => {
            let function = Function::from_name(name)
                .ok_or_else(|| EvalError::UnknownFunction(name.clone()))?;
            let args = args.iter().map(eval).collect::<Result<Vec<_>, _>>()?;
            function.call(args)
        }
        Expr::Matrix(rows) => {
            let rows = rows
                .iter()
                .map(|row| row.iter().map(eval).collect::<Result<Vec<_>, _>>())
                .collect::<Result<Vec<_>, _>>()?;
            Matrix::from_rows(rows).map(Value::Matrix)
        }
    }
}

fn constant(name: &str) -> Result<Value, EvalError> {
    match name {
        "pi" => Ok(Value::Number(consts::PI)),
        "e" => Ok(Value::Number(consts::E)),
        "i" => Ok(Value::Complex(Complex::I)),
        _ => Err(EvalError::UndefinedSymbol(name.to_string())),
    }
}

/// Built-in functions. Trigonometry works in radians and `log` is the
/// natural logarithm unless a base is given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Function {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Log,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "tan" => Some(Self::Tan),
            "sqrt" => Some(Self::Sqrt),
            "log" => Some(Self::Log),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sqrt => "sqrt",
            Self::Log => "log",
        }
    }

    fn call(self, args: Vec<Value>) -> Result<Value, EvalError> {
        let got = args.len();
        let mut args = args.into_iter();

        match (self, args.next(), args.next(), args.next()) {
            (_, Some(x), None, None) => self.apply(x),
            (Self::Log, Some(x), Some(base), None) => log_base(x, base),
            _ => Err(EvalError::WrongArity {
                name: self.name().to_string(),
                expected: if self == Self::Log { "1 or 2" } else { "1" },
                got,
            }),
        }
    }

    fn apply(self, arg: Value) -> Result<Value, EvalError> {
        match arg {
            Value::Number(x) => Ok(self.real(x)),
            Value::Complex(z) => Ok(Value::Complex(self.complex(z))),
            Value::Matrix(m) => m
                .try_map(|x| match self.real(x) {
                    Value::Number(n) => Ok(n),
                    _ => Err(EvalError::Unsupported(format!(
                        "{}() of {} gives a complex matrix element",
                        self.name(),
                        x
                    ))),
                })
                .map(Value::Matrix),
        }
    }

    fn real(self, x: f64) -> Value {
        match self {
            Self::Sin => Value::Number(x.sin()),
            Self::Cos => Value::Number(x.cos()),
            Self::Tan => Value::Number(x.tan()),
            Self::Sqrt if x < 0.0 => Value::Complex(Complex::new(0.0, (-x).sqrt())),
            Self::Sqrt => Value::Number(x.sqrt()),
            Self::Log if x < 0.0 => Value::Complex(Complex::new((-x).ln(), consts::PI)),
            Self::Log => Value::Number(x.ln()),
        }
    }

    fn complex(self, z: Complex) -> Complex {
        match self {
            Self::Sin => z.sin(),
            Self::Cos => z.cos(),
            Self::Tan => z.tan(),
            Self::Sqrt => z.sqrt(),
            Self::Log => z.ln(),
        }
    }
}

fn log_base(x: Value, base: Value) -> Result<Value, EvalError> {
    match (x, base) {
        (Value::Number(x), Value::Number(b)) if x >= 0.0 && b > 0.0 => {
            Ok(Value::Number(x.ln() / b.ln()))
        }
        (Value::Matrix(m), Value::Number(b)) if b > 0.0 => {
            Ok(Value::Matrix(m.map(|x| x.ln() / b.ln())))
        }
        (Value::Matrix(_), _) | (_, Value::Matrix(_)) => Err(EvalError::Unsupported(
            "log() of a matrix needs a positive number base".to_string(),
        )),
        (x, b) => Ok(Value::Complex(to_complex(x).ln() / to_complex(b).ln())),
    }
}

fn to_complex(value: Value) -> Complex {
    match value {
        Value::Complex(z) => z,
        Value::Number(n) => n.into(),
        // Matrices are filtered out before this point.
        Value::Matrix(_) => Complex::new(f64::NAN, f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::parser::MAX_DEPTH;
    use crate::calculator::scan;

    #[test]
    fn test_basic_evaluation() {
        assert_eq!(evaluate_expression("2 + 2"), "4");
        assert_eq!(evaluate_expression("2^3"), "8");
        assert_eq!(evaluate_expression("  10 / 4  "), "2.5");
        assert_eq!(evaluate_expression("2 + 3 * 4"), "14");
        assert_eq!(evaluate_expression("(2 + 3) * 4"), "20");
    }

    #[test]
    fn test_functions() {
        assert_eq!(evaluate_expression("sqrt(16)"), "4");
        assert_eq!(evaluate_expression("sin(pi/2)"), "1");
        assert_eq!(evaluate_expression("cos(0)"), "1");
        assert_eq!(evaluate_expression("log(e)"), "1");
        assert_eq!(evaluate_expression("log(8, 2)"), "3");
        assert_eq!(evaluate_expression("tan(pi/4)"), "1");
    }

    #[test]
    fn test_constants() {
        assert_eq!(evaluate_expression("pi"), "3.1415926535898");
        assert_eq!(evaluate_expression("e"), "2.718281828459");
        assert_eq!(evaluate_expression("2*pi"), "6.2831853071796");
    }

    #[test]
    fn test_unary_signs() {
        assert_eq!(evaluate_expression("-2^2"), "-4e+0");
        assert_eq!(evaluate_expression("2^-1"), "0.5");
        assert_eq!(evaluate_expression("--3"), "3");
        assert_eq!(evaluate_expression("+3"), "3");
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate_expression("1/0"), ERROR_RESULT);
        assert_eq!(evaluate_expression("0/0"), ERROR_RESULT);
        assert_eq!(try_evaluate("1/0"), Err(EvalError::NonFinite));
    }

    #[test]
    fn test_invalid_expressions() {
        assert_eq!(evaluate_expression("2 + "), ERROR_RESULT);
        assert_eq!(evaluate_expression("log()"), ERROR_RESULT);
        assert_eq!(evaluate_expression("2 +* 2"), ERROR_RESULT);
        assert_eq!(evaluate_expression(""), ERROR_RESULT);
        assert_eq!(evaluate_expression("sqrt(sin(pi)"), ERROR_RESULT);
    }

    #[test]
    fn test_negative_results_use_exponential() {
        assert_eq!(evaluate_expression("5-9"), "-4e+0");
        assert_eq!(evaluate_expression("0 - 1/4"), "-2.5e-1");
    }

    #[test]
    fn test_deep_nesting_is_error() {
        let note = format!("sqrt({}1)", "(".repeat(5_000));
        let found = scan(&note);
        assert_eq!(found.len(), 1);
        assert_eq!(evaluate_expression(&found[0]), ERROR_RESULT);

        let parens = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(evaluate_expression(&parens), ERROR_RESULT);

        let signs = format!("sqrt({}1)", "-".repeat(10_000));
        assert_eq!(evaluate_expression(&signs), ERROR_RESULT);

        let nested = format!("{}1{}", "(".repeat(150), ")".repeat(150));
        assert_eq!(try_evaluate(&nested), Err(EvalError::TooDeep(MAX_DEPTH)));
    }

    #[test]
    fn test_error_reasons() {
        assert_eq!(
            try_evaluate("foo + 1"),
            Err(EvalError::UndefinedSymbol("foo".to_string()))
        );
        assert_eq!(
            try_evaluate("abs(1)"),
            Err(EvalError::UnknownFunction("abs".to_string()))
        );
        assert!(matches!(
            try_evaluate("sqrt(1, 2)"),
            Err(EvalError::WrongArity { got: 2, .. })
        ));
        assert!(matches!(
            try_evaluate("log()"),
            Err(EvalError::WrongArity { got: 0, .. })
        ));
    }

    #[test]
    fn test_notation_switch() {
        assert_eq!(evaluate_expression("2000000"), "2e+6");
        assert_eq!(evaluate_expression("1000 * 1000"), "1000000");
        assert_eq!(evaluate_expression("500"), "500");
        assert_eq!(evaluate_expression("1/10000000"), "1e-7");
    }

    #[test]
    fn test_complex_results() {
        assert_eq!(evaluate_expression("sqrt(-4)"), "2i");
        assert_eq!(evaluate_expression("i * i"), "-1");
        assert_eq!(evaluate_expression("2 + 3*i"), "2 + 3i");
        assert_eq!(evaluate_expression("log(-1)"), "3.141592653589793i");
    }

    #[test]
    fn test_matrix_results() {
        assert_eq!(evaluate_expression("[1, 2, 3] * 2"), "[2, 4, 6]");
        assert_eq!(evaluate_expression("[1, 2] + [3, 4]"), "[4, 6]");
        assert_eq!(evaluate_expression("[1, 2, 3] * [4, 5, 6]"), "32");
        assert_eq!(
            evaluate_expression("[[1, 2], [3, 4]] * [[1, 0], [0, 1]]"),
            "[[1, 2], [3, 4]]"
        );
        assert_eq!(evaluate_expression("[1, 2; 3, 4]"), "[[1, 2], [3, 4]]");
        assert_eq!(evaluate_expression("sqrt([4, 9])"), "[2, 3]");
        assert_eq!(evaluate_expression("[1, 2] + [1, 2, 3]"), ERROR_RESULT);
        assert_eq!(evaluate_expression("[1, 2] ^ 2"), ERROR_RESULT);
        assert_eq!(evaluate_expression("[1, 2] / 0"), ERROR_RESULT);
    }

    #[test]
    fn test_custom_precision() {
        let calc = Calculator::new(FormatOptions {
            precision: 4,
            ..FormatOptions::default()
        });
        assert_eq!(calc.evaluate("pi"), "3.142");
        assert_eq!(calc.evaluate("2 + 2"), "4");
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        for expr in ["2 + 2", "sqrt(2)", "1/0", "[1, 2]"] {
            assert_eq!(evaluate_expression(expr), evaluate_expression(expr));
        }
    }

    #[test]
    fn test_results_keep_fourteen_digits() {
        for (expr, expected) in [
            ("1/3", 1.0 / 3.0),
            ("sqrt(2)", 2f64.sqrt()),
            ("2/7 + 100", 2.0 / 7.0 + 100.0),
        ] {
            let shown: f64 = evaluate_expression(expr).parse().unwrap();
            assert!(((shown - expected) / expected).abs() < 1e-13, "{}", expr);
        }
    }
}
