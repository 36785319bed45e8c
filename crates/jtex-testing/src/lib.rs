/*!
JTeX unit testing library

This is a crate for writing unit tests for JTeX commands and operators.
It is used throughout the JTeX standard library,
    so the unit tests there are good examples of what this crate can do.

Every test runs a complete conversion of a small JTeX snippet against a [`Registry`].

## Test types

### Conversion tests

Run using [`run_conversion_test`].

These tests verify that a JTeX snippet converts to a specific LaTeX output,
    and that the conversion produced no warnings.
For example, a conversion test can verify that
```text
-- a/b;
```
converts to
```tex
$\frac{a}{b}$
```

### Warning tests

Run using [`run_warning_test`].

Like conversion tests, but the conversion is expected to produce a specific number of warnings.

### Failure tests

Run using [`run_failure_test`].

These tests verify that a specific JTeX snippet fails to convert.

## The test suite macro

The [`test_suite`] macro generates one `#[test]` function per test case:

```ignore
use jtex_testing::*;

fn registry() -> jtex::command::Registry {
    jtex_stdlib::registry()
}

test_suite![
    conversion_tests(
        (fraction, "-- a/b;", r"$\frac{a}{b}$"),
    ),
    failure_tests(
        (mismatched_bracket, "-- (a;"),
    ),
];
```

Without an explicit `registry(...)` argument the macro calls a function named `registry`
    that must be in scope.
*/

use jtex::command::Registry;
use jtex::vm::{self, Options};

/// Runs a conversion test.
///
/// The conversion must succeed with the expected output and no warnings.
pub fn run_conversion_test(input: &str, expected: &str, registry: &Registry) {
    run_warning_test(input, expected, 0, registry)
}

/// Runs a conversion test with non-default conversion options.
pub fn run_conversion_test_with_options(
    input: &str,
    expected: &str,
    registry: &Registry,
    options: &Options,
) {
    let conversion = match vm::convert(input, registry, options) {
        Ok(conversion) => conversion,
        Err(err) => {
            println!("{err}");
            panic!("Conversion failed for input {input:?}");
        }
    };
    compare_output(input, &conversion.output, expected);
}

/// Runs a conversion test that expects a specific number of warnings.
pub fn run_warning_test(input: &str, expected: &str, num_warnings: usize, registry: &Registry) {
    let conversion = match vm::convert(input, registry, &Default::default()) {
        Ok(conversion) => conversion,
        Err(err) => {
            println!("{err}");
            panic!("Conversion failed for input {input:?}");
        }
    };
    compare_output(input, &conversion.output, expected);
    if conversion.warnings.len() != num_warnings {
        for warning in &conversion.warnings {
            println!("{warning}");
        }
        panic!(
            "Expected {num_warnings} warning(s), got {}",
            conversion.warnings.len()
        );
    }
}

fn compare_output(input: &str, got: &str, expected: &str) {
    if got != expected {
        println!("Input:");
        println!("{input}");
        println!("Expected output:");
        println!("{expected}");
        println!("Actual output:");
        println!("{got}");
        println!("Expected output (escaped): {expected:?}");
        println!("Actual output (escaped):   {got:?}");
        panic!("Conversion test failed");
    }
}

/// Runs a failure test.
///
/// The conversion must fail.
pub fn run_failure_test(input: &str, registry: &Registry) {
    if let Ok(conversion) = vm::convert(input, registry, &Default::default()) {
        println!("Conversion succeeded:");
        println!("{}", conversion.output);
        panic!("Conversion failure test did not pass: conversion successful");
    }
}

/// Macro to generate a suite of unit tests
///
/// The general use of this macro looks like this:
/// ```ignore
/// test_suite![
///     registry(my_registry()),
///     conversion_tests(
///         (name_1, "input_1", "output_1"),
///     ),
///     warning_tests(
///         (name_2, "input_2", "output_2", 1),
///     ),
///     failure_tests(
///         (name_3, "input_3"),
///     ),
/// ];
/// ```
///
/// The `registry` argument may be omitted, in which case a function `registry()` in the
///     calling scope is used.
#[macro_export]
macro_rules! test_suite {
    ( registry($registry: expr), conversion_tests ( $( ($name: ident, $input: expr, $want: expr $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                let registry = $registry;
                jtex_testing::run_conversion_test($input, $want, &registry);
            }
        )*
    );
    ( registry($registry: expr), conversion_tests $test_body: tt $(,)? ) => (
        compile_error!("Invalid test cases for conversion_tests: must be a list of tuples (name, input, output)");
    );
    ( registry($registry: expr), warning_tests ( $( ($name: ident, $input: expr, $want: expr, $num_warnings: expr $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                let registry = $registry;
                jtex_testing::run_warning_test($input, $want, $num_warnings, &registry);
            }
        )*
    );
    ( registry($registry: expr), warning_tests $test_body: tt $(,)? ) => (
        compile_error!("Invalid test cases for warning_tests: must be a list of tuples (name, input, output, num_warnings)");
    );
    ( registry($registry: expr), failure_tests ( $( ($name: ident, $input: expr $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                let registry = $registry;
                jtex_testing::run_failure_test($input, &registry);
            }
        )*
    );
    ( registry($registry: expr), failure_tests $test_body: tt $(,)? ) => (
        compile_error!("Invalid test cases for failure_tests: must be a list of tuples (name, input)");
    );
    ( registry($registry: expr), $test_kind: ident $test_cases: tt $(,)? ) => (
        compile_error!("Invalid keyword: test_suite! only accepts the following keywords: `registry`, `conversion_tests`, `warning_tests`, `failure_tests`");
    );
    ( registry($registry: expr), $( $test_kind: ident $test_cases: tt ),+ $(,)? ) => (
        $(
            jtex_testing::test_suite![registry($registry), $test_kind $test_cases,];
        )+
    );
    ( $( $test_kind: ident $test_cases: tt ),+ $(,)? ) => (
        jtex_testing::test_suite![registry(registry()), $( $test_kind $test_cases, )+ ];
    );
}
