//! Input source identities

/// Where a command line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Source {
    /// Web interface
    Network,
    /// USB/UART host
    Serial,
    /// Job file being printed
    File,
}

impl Source {
    /// All sources in scheduling priority order
    pub const ALL: [Source; 3] = [Source::Network, Source::Serial, Source::File];

    /// Prefix used when echoing lines from this source
    pub fn prefix(&self) -> &'static str {
        match self {
            Source::Network => "web: ",
            Source::Serial => "serial: ",
            Source::File => "file: ",
        }
    }

}

impl core::fmt::Display for Source {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Source::Network => "network",
            Source::Serial => "serial",
            Source::File => "file",
        })
    }
}
