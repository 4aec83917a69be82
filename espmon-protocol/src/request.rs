//! Poll requests (display → producer)

/// Encoded size of every request
pub const REQUEST_LEN: usize = 2;

/// A poll request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    /// Ask for the screen descriptor of `page`
    ScreenInfo { page: u8 },
    /// Ask for the current readings of `page`
    Data { page: u8 },
}

impl Request {
    pub const CMD_SCREEN_INFO: i8 = 0;
    pub const CMD_DATA: i8 = 1;

    /// The request a display with `page` selected sends on its poll tick
    ///
    /// Without a page the display first asks for page 0's descriptor.
    pub fn poll(page: Option<u8>) -> Self {
        match page {
            None => Request::ScreenInfo { page: 0 },
            Some(page) => Request::Data { page },
        }
    }

    pub fn page(self) -> u8 {
        match self {
            Request::ScreenInfo { page } | Request::Data { page } => page,
        }
    }

    pub fn to_bytes(self) -> [u8; REQUEST_LEN] {
        let command = match self {
            Request::ScreenInfo { .. } => Self::CMD_SCREEN_INFO,
            Request::Data { .. } => Self::CMD_DATA,
        };
        [command as u8, self.page()]
    }

    /// Parse a request; `None` for an unknown command
    pub fn from_bytes(bytes: [u8; REQUEST_LEN]) -> Option<Self> {
        let [command, page] = bytes;
        match command as i8 {
            Self::CMD_SCREEN_INFO => Some(Request::ScreenInfo { page }),
            Self::CMD_DATA => Some(Request::Data { page }),
            _ => None,
        }
    }
}
