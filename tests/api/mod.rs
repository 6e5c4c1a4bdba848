//! REST API Tests

mod chatroom_tests;
mod health_tests;
mod middleware_tests;
mod premium_tests;
mod signup_wizard_tests;
