//! Host-side integration tests for the sample/encode/notify pipeline.

mod mock_hw;

mod ble_link_tests;
mod sample_loop_tests;
