//! Temperature subsystem interface

/// Heater index of the shared bed
pub const BED_HEATER: usize = 0;

/// Heater index of a tool head
///
/// Tool heads sit one above the bed.
pub fn tool_heater(tool: u8) -> usize {
    tool as usize + 1
}

/// Trait for the temperature subsystem
///
/// Implementations own the PID loops; the interpreter only sets targets
/// and switches heads between active and standby. None of these calls may
/// block.
pub trait HeatSystem {
    /// Set the target used while the head is active
    fn set_active_temperature(&mut self, heater: usize, celsius: f32);

    /// Set the target used while the head is in standby
    fn set_standby_temperature(&mut self, heater: usize, celsius: f32);

    /// Switch the head to its active target
    fn activate(&mut self, heater: usize);

    /// Switch the head to its standby target
    fn standby(&mut self, heater: usize);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_heaters_skip_bed() {
        assert_eq!(tool_heater(0), 1);
        assert_eq!(tool_heater(3), 4);
        assert_ne!(tool_heater(0), BED_HEATER);
    }
}
