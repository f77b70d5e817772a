/// Process exit codes of the `junit-reporter` binary.
pub mod exit {
    pub const SUCCESS: i32 = 0;
    /// Report could not be built or written.
    pub const OPERATIONAL_FAILURE: i32 = 1;
    /// Event stream ended before `report:runner:finished`.
    pub const INCOMPLETE_STREAM: i32 = 2;
}
