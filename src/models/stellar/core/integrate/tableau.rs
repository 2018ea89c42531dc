//! Fehlberg's 4(5) coefficient table.
//!
//! Fehlberg, E. (1969). "Low-order classical Runge-Kutta formulas with
//! stepsize control and their application to some heat transfer problems",
//! NASA TR R-315, Table III.

pub(super) const STAGES: usize = 6;

/// Stage nodes, as fractions of the step.
pub(super) const C: [f64; STAGES] = [0.0, 1.0 / 4.0, 3.0 / 8.0, 12.0 / 13.0, 1.0, 1.0 / 2.0];

/// Stage coupling coefficients (strictly lower triangular).
pub(super) const A: [[f64; STAGES]; STAGES] = [
    [0.0; STAGES],
    [1.0 / 4.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 32.0, 9.0 / 32.0, 0.0, 0.0, 0.0, 0.0],
    [
        1932.0 / 2197.0,
        -7200.0 / 2197.0,
        7296.0 / 2197.0,
        0.0,
        0.0,
        0.0,
    ],
    [
        439.0 / 216.0,
        -8.0,
        3680.0 / 513.0,
        -845.0 / 4104.0,
        0.0,
        0.0,
    ],
    [
        -8.0 / 27.0,
        2.0,
        -3544.0 / 2565.0,
        1859.0 / 4104.0,
        -11.0 / 40.0,
        0.0,
    ],
];

/// Fifth-order weights.
pub(super) const B5: [f64; STAGES] = [
    16.0 / 135.0,
    0.0,
    6656.0 / 12825.0,
    28561.0 / 56430.0,
    -9.0 / 50.0,
    2.0 / 55.0,
];

/// Fourth-order weights; this solution is the one committed.
pub(super) const B4: [f64; STAGES] = [
    25.0 / 216.0,
    0.0,
    1408.0 / 2565.0,
    2197.0 / 4104.0,
    -1.0 / 5.0,
    0.0,
];
