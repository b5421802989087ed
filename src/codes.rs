use core::fmt::{
    Display,
    Formatter,
    Result,
};

/// Result codes printed by the APC command line interface after every command, e.g.
/// `E000: Success` or `E102: Parameter Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    /// E000 - Success
    Success,
    /// E001 - Successfully Issued
    SuccessfullyIssued,
    /// E002 - Reboot required for change to take effect
    RebootRequired,
    /// E100 - Command failed
    CommandFailed,
    /// E101 - Command not found
    CommandNotFound,
    /// E102 - Parameter Error
    ParameterError,
    /// E103 - Command Line Error
    CommandLineError,
    /// E104 - User Level Denial
    UserLevelDenial,
    /// E105 - Command Prefill
    CommandPrefill,
    /// E106 - Data Not Available
    DataNotAvailable,
    /// E107 - Serial communication with the device has been lost
    SerialCommunicationLost,
}

impl ResultCode {
    /// Parse a code such as `"E102"` (an optional trailing colon is ignored).
    #[must_use]
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().trim_end_matches(':') {
            "E000" => Some(Self::Success),
            "E001" => Some(Self::SuccessfullyIssued),
            "E002" => Some(Self::RebootRequired),
            "E100" => Some(Self::CommandFailed),
            "E101" => Some(Self::CommandNotFound),
            "E102" => Some(Self::ParameterError),
            "E103" => Some(Self::CommandLineError),
            "E104" => Some(Self::UserLevelDenial),
            "E105" => Some(Self::CommandPrefill),
            "E106" => Some(Self::DataNotAvailable),
            "E107" => Some(Self::SerialCommunicationLost),
            _ => None,
        }
    }

    /// The code as printed by the device, without the colon.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Success => "E000",
            Self::SuccessfullyIssued => "E001",
            Self::RebootRequired => "E002",
            Self::CommandFailed => "E100",
            Self::CommandNotFound => "E101",
            Self::ParameterError => "E102",
            Self::CommandLineError => "E103",
            Self::UserLevelDenial => "E104",
            Self::CommandPrefill => "E105",
            Self::DataNotAvailable => "E106",
            Self::SerialCommunicationLost => "E107",
        }
    }

    /// Human-readable description of the code.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::SuccessfullyIssued => "Successfully Issued",
            Self::RebootRequired => "Reboot required for change to take effect",
            Self::CommandFailed => "Command failed",
            Self::CommandNotFound => "Command not found",
            Self::ParameterError => "Parameter Error",
            Self::CommandLineError => "Command Line Error",
            Self::UserLevelDenial => "User Level Denial",
            Self::CommandPrefill => "Command Prefill",
            Self::DataNotAvailable => "Data Not Available",
            Self::SerialCommunicationLost => "Serial communication with the device has been lost",
        }
    }
}

impl Display for ResultCode {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> Result {
        write!(f, "{} ({})", self.code(), self.description())
    }
}
