mod property_tests;
mod workflow_tests;
