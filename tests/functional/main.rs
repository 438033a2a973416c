//! Functional tests: full application boot against a mock internal service
