
mod property_resolve;
