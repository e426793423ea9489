// This file is the module declaration file for the `builders` module.
// It exposes the building blocks the engine composes into a report.

// `levels` module:
// Defines `LevelMarker` and the `LevelMatcher` trait, which split a source
// into level regions and measure each one.
pub mod levels;

// `reporter` module:
// Holds `FileReport` and the `StatsReporter` implementations that print
// reports as plain text, JSON or YAML.
pub mod reporter;

// `validator` module:
// The `ConfigValidator` trait and `StandardValidator`, which flag settings
// that would make a scan fail or silently report nothing.
pub mod validator;
