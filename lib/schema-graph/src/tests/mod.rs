pub mod testkit;

mod scenarios;
