//! Evaluation results and the arithmetic between them.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use super::error::EvalError;
use super::parser::BinaryOp;

/// Components smaller than this print as zero in complex results.
const COMPLEX_EPSILON: f64 = 1e-15;

/// The outcome of evaluating an expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Complex(Complex),
    Matrix(Matrix),
}

impl Value {
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Number(n) => n.is_finite(),
            Self::Complex(c) => c.is_finite(),
            Self::Matrix(m) => m.elements().all(|n| n.is_finite()),
        }
    }

    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Complex(_) => "complex",
            Self::Matrix(_) => "matrix",
        }
    }

    pub fn negate(self) -> Value {
        match self {
            Self::Number(n) => Self::Number(-n),
            Self::Complex(c) => Self::Complex(-c),
            Self::Matrix(m) => Self::Matrix(m.map(|n| -n)),
        }
    }
}

/// Apply a binary operator to two values.
pub fn apply_binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(real_binary(op, a, b)),
        (Value::Number(a), Value::Complex(b)) => Ok(complex_binary(op, a.into(), b)),
        (Value::Complex(a), Value::Number(b)) => Ok(complex_binary(op, a, b.into())),
        (Value::Complex(a), Value::Complex(b)) => Ok(complex_binary(op, a, b)),
        (Value::Matrix(a), Value::Number(b)) => matrix_scalar(op, a, b),
        (Value::Number(a), Value::Matrix(b)) => scalar_matrix(op, a, b),
        (Value::Matrix(a), Value::Matrix(b)) => matrix_matrix(op, a, b),
        (lhs, rhs) => Err(EvalError::Unsupported(format!(
            "{} {} {}",
            lhs.kind(),
            op_symbol(op),
            rhs.kind()
        ))),
    }
}

fn op_symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Pow => "^",
    }
}

fn real_binary(op: BinaryOp, a: f64, b: f64) -> Value {
    match op {
        BinaryOp::Add => Value::Number(a + b),
        BinaryOp::Sub => Value::Number(a - b),
        BinaryOp::Mul => Value::Number(a * b),
        BinaryOp::Div => Value::Number(a / b),
        BinaryOp::Pow => {
            // A negative base with a fractional exponent has no real result.
            if a < 0.0 && b.fract() != 0.0 && b.is_finite() {
                Value::Complex(Complex::from(a).powc(b.into()))
            } else {
                Value::Number(a.powf(b))
            }
        }
    }
}

fn complex_binary(op: BinaryOp, a: Complex, b: Complex) -> Value {
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Pow => a.powc(b),
    };
    Value::Complex(result)
}

fn matrix_scalar(op: BinaryOp, m: Matrix, s: f64) -> Result<Value, EvalError> {
    let mapped = match op {
        BinaryOp::Add => m.map(|x| x + s),
        BinaryOp::Sub => m.map(|x| x - s),
        BinaryOp::Mul => m.map(|x| x * s),
        BinaryOp::Div => m.map(|x| x / s),
        BinaryOp::Pow => return Err(EvalError::Unsupported("matrix ^ number".to_string())),
    };
    Ok(Value::Matrix(mapped))
}

fn scalar_matrix(op: BinaryOp, s: f64, m: Matrix) -> Result<Value, EvalError> {
    let mapped = match op {
        BinaryOp::Add => m.map(|x| s + x),
        BinaryOp::Sub => m.map(|x| s - x),
        BinaryOp::Mul => m.map(|x| s * x),
        BinaryOp::Div => return Err(EvalError::Unsupported("number / matrix".to_string())),
        BinaryOp::Pow => return Err(EvalError::Unsupported("number ^ matrix".to_string())),
    };
    Ok(Value::Matrix(mapped))
}

fn matrix_matrix(op: BinaryOp, a: Matrix, b: Matrix) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Add => a.zip(&b, |x, y| x + y).map(Value::Matrix),
        BinaryOp::Sub => a.zip(&b, |x, y| x - y).map(Value::Matrix),
        BinaryOp::Mul => a.multiply(&b),
        BinaryOp::Div => Err(EvalError::Unsupported("matrix / matrix".to_string())),
        BinaryOp::Pow => Err(EvalError::Unsupported("matrix ^ matrix".to_string())),
    }
}

/// A complex number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const I: Complex = Complex { re: 0.0, im: 1.0 };

    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    pub fn abs(self) -> f64 {
        self.re.hypot(self.im)
    }

    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    pub fn exp(self) -> Self {
        let scale = self.re.exp();
        Self::new(scale * self.im.cos(), scale * self.im.sin())
    }

    /// Principal natural logarithm.
    pub fn ln(self) -> Self {
        Self::new(self.abs().ln(), self.arg())
    }

    /// Principal square root.
    pub fn sqrt(self) -> Self {
        let r = self.abs();
        let re = ((r + self.re) / 2.0).sqrt();
        let im = ((r - self.re) / 2.0).sqrt();
        Self::new(re, if self.im < 0.0 { -im } else { im })
    }

    pub fn powc(self, exponent: Complex) -> Self {
        if self.re == 0.0 && self.im == 0.0 {
            return if exponent.re == 0.0 && exponent.im == 0.0 {
                Self::new(1.0, 0.0)
            } else {
                Self::new(0.0, 0.0)
            };
        }
        (exponent * self.ln()).exp()
    }

    pub fn sin(self) -> Self {
        Self::new(
            self.re.sin() * self.im.cosh(),
            self.re.cos() * self.im.sinh(),
        )
    }

    pub fn cos(self) -> Self {
        Self::new(
            self.re.cos() * self.im.cosh(),
            -self.re.sin() * self.im.sinh(),
        )
    }

    pub fn tan(self) -> Self {
        self.sin() / self.cos()
    }
}

impl From<f64> for Complex {
    fn from(re: f64) -> Self {
        Self::new(re, 0.0)
    }
}

impl Add for Complex {
    type Output = Complex;

    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;

    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;

    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Div for Complex {
    type Output = Complex;

    fn div(self, rhs: Complex) -> Complex {
        let denom = rhs.re * rhs.re + rhs.im * rhs.im;
        Complex::new(
            (self.re * rhs.re + self.im * rhs.im) / denom,
            (self.im * rhs.re - self.re * rhs.im) / denom,
        )
    }
}

impl Neg for Complex {
    type Output = Complex;

    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

impl fmt::Display for Complex {
    /// Prints `a + bi`, `a - bi`, `bi`, `i` or just `a` when the imaginary
    /// part vanishes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snap = |x: f64| if x.abs() < COMPLEX_EPSILON { 0.0 } else { x };
        let re = snap(self.re);
        let mut im = snap(self.im);

        if im == 0.0 {
            return f.write_str(&shortest(re));
        }

        if re != 0.0 {
            write!(f, "{} ", shortest(re))?;
            if im < 0.0 {
                im = -im;
                f.write_str("- ")?;
            } else {
                f.write_str("+ ")?;
            }
        } else if im < 0.0 {
            im = -im;
            f.write_str("-")?;
        }

        if im != 1.0 {
            f.write_str(&shortest(im))?;
        }
        f.write_str("i")
    }
}

/// Shortest round-trip text for a complex component: plain decimal, or
/// exponential with a signed exponent (`1e+21`, `1.5e-7`) when the
/// magnitude is at least `1e21` or below `1e-6`.
fn shortest(x: f64) -> String {
    let magnitude = x.abs();
    if magnitude == 0.0 || (1e-6..1e21).contains(&magnitude) {
        return x.to_string();
    }

    let text = format!("{:e}", x);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}

/// A numeric vector or 2-D matrix.
#[derive(Clone, Debug, PartialEq)]
pub enum Matrix {
    Vector(Vec<f64>),
    /// Non-empty list of rows, all of the same length.
    Grid(Vec<Vec<f64>>),
}

impl Matrix {
    /// Build a matrix from literal rows of already evaluated values.
    ///
    /// A single row of numbers is a vector; a single row of equal-length
    /// vectors, or several rows of numbers, is a grid.
    pub fn from_rows(rows: Vec<Vec<Value>>) -> Result<Matrix, EvalError> {
        if rows.len() == 1 {
            let row = rows.into_iter().next().unwrap_or_default();
            if row.iter().all(|v| matches!(v, Value::Number(_))) {
                return Ok(Matrix::Vector(numbers(row)?));
            }
            let grid = row
                .into_iter()
                .map(|v| match v {
                    Value::Matrix(Matrix::Vector(inner)) => Ok(inner),
                    other => Err(EvalError::Unsupported(format!(
                        "{} inside matrix row",
                        other.kind()
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Matrix::grid(grid);
        }

        if rows.is_empty() {
            return Ok(Matrix::Vector(Vec::new()));
        }

        let grid = rows
            .into_iter()
            .map(numbers)
            .collect::<Result<Vec<_>, _>>()?;
        Matrix::grid(grid)
    }

    fn grid(rows: Vec<Vec<f64>>) -> Result<Matrix, EvalError> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|r| r.len() != width) {
            return Err(EvalError::DimensionMismatch(
                "matrix rows have different lengths".to_string(),
            ));
        }
        Ok(Matrix::Grid(rows))
    }

    pub fn elements(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match self {
            Self::Vector(v) => Box::new(v.iter().copied()),
            Self::Grid(rows) => Box::new(rows.iter().flatten().copied()),
        }
    }

    pub fn map(self, f: impl Fn(f64) -> f64) -> Matrix {
        match self {
            Self::Vector(v) => Self::Vector(v.into_iter().map(&f).collect()),
            Self::Grid(rows) => Self::Grid(
                rows.into_iter()
                    .map(|r| r.into_iter().map(&f).collect::<Vec<f64>>())
                    .collect(),
            ),
        }
    }

    /// Map every element through a fallible function.
    pub fn try_map(
        self,
        f: impl Fn(f64) -> Result<f64, EvalError>,
    ) -> Result<Matrix, EvalError> {
        Ok(match self {
            Self::Vector(v) => {
                Self::Vector(v.into_iter().map(&f).collect::<Result<Vec<f64>, _>>()?)
            }
            Self::Grid(rows) => Self::Grid(
                rows.into_iter()
                    .map(|r| r.into_iter().map(&f).collect::<Result<Vec<f64>, _>>())
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        })
    }

    fn shape(&self) -> (usize, usize) {
        match self {
            Self::Vector(v) => (v.len(), 1),
            Self::Grid(rows) => (rows.len(), rows.first().map(Vec::len).unwrap_or(0)),
        }
    }

    /// Elementwise combination of two matrices with the same shape.
    pub fn zip(&self, other: &Matrix, f: impl Fn(f64, f64) -> f64) -> Result<Matrix, EvalError> {
        match (self, other) {
            (Self::Vector(a), Self::Vector(b)) if a.len() == b.len() => Ok(Self::Vector(
                a.iter().zip(b).map(|(x, y)| f(*x, *y)).collect(),
            )),
            (Self::Grid(a), Self::Grid(b)) if self.shape() == other.shape() => Ok(Self::Grid(
                a.iter()
                    .zip(b)
                    .map(|(ra, rb)| {
                        ra.iter()
                            .zip(rb)
                            .map(|(x, y)| f(*x, *y))
                            .collect::<Vec<f64>>()
                    })
                    .collect(),
            )),
            _ => Err(self.mismatch(other)),
        }
    }

    /// Matrix product. Two vectors give their dot product.
    pub fn multiply(&self, other: &Matrix) -> Result<Value, EvalError> {
        match (self, other) {
            (Self::Vector(a), Self::Vector(b)) if a.len() == b.len() => {
                Ok(Value::Number(dot(a, b)))
            }
            (Self::Grid(a), Self::Vector(v)) if self.shape().1 == v.len() => Ok(Value::Matrix(
                Self::Vector(a.iter().map(|row| dot(row, v)).collect()),
            )),
            (Self::Vector(v), Self::Grid(b)) if v.len() == b.len() => {
                let cols = other.shape().1;
                Ok(Value::Matrix(Self::Vector(
                    (0..cols)
                        .map(|j| v.iter().zip(b).map(|(x, row)| x * row[j]).sum::<f64>())
                        .collect(),
                )))
            }
            (Self::Grid(a), Self::Grid(b)) if self.shape().1 == b.len() => {
                let cols = other.shape().1;
                let product = a
                    .iter()
                    .map(|row| {
                        (0..cols)
                            .map(|j| row.iter().zip(b).map(|(x, brow)| x * brow[j]).sum::<f64>())
                            .collect::<Vec<f64>>()
                    })
                    .collect();
                Ok(Value::Matrix(Self::Grid(product)))
            }
            _ => Err(self.mismatch(other)),
        }
    }

    fn mismatch(&self, other: &Matrix) -> EvalError {
        let (r1, c1) = self.shape();
        let (r2, c2) = other.shape();
        EvalError::DimensionMismatch(format!("[{}, {}] vs [{}, {}]", r1, c1, r2, c2))
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum::<f64>()
}

fn numbers(row: Vec<Value>) -> Result<Vec<f64>, EvalError> {
    row.into_iter()
        .map(|v| match v {
            Value::Number(n) => Ok(n),
            other => Err(EvalError::Unsupported(format!(
                "{} inside matrix",
                other.kind()
            ))),
        })
        .collect()
}
