mod derivation_test;
mod property_test;
mod validation_test;
