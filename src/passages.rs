//! Puzzle content
//!
//! The engine never invents passages; these are handed to it at construction.

use serde::{Deserialize, Serialize};

/// A plaintext passage to be turned into a puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub id: u32,
    pub name: String,
    pub text: String,
}

impl Passage {
    pub fn new(id: u32, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            text: text.into(),
        }
    }
}

/// The seven OSI layers, one two-sentence description each
pub fn osi_layers() -> Vec<Passage> {
    vec![
        Passage::new(
            1,
            "Physical",
            "The Physical layer is responsible for transmitting raw bits across a physical medium such as cables or radio waves. It defines electrical, mechanical, and signaling standards to ensure reliable communication between devices.",
        ),
        Passage::new(
            2,
            "Data Link",
            "The Data Link layer provides node-to-node communication and handles error detection, correction, and flow control. It ensures that data frames are delivered reliably across the physical connection.",
        ),
        Passage::new(
            3,
            "Network",
            "The Network layer determines the best path for data to travel between devices across multiple networks. It handles logical addressing, routing, and packet forwarding to enable connectivity on a global scale.",
        ),
        Passage::new(
            4,
            "Transport",
            "The Transport layer ensures complete end-to-end delivery of data between applications. It provides segmentation, error recovery, and flow control through protocols such as TCP and UDP.",
        ),
        Passage::new(
            5,
            "Session",
            "The Session layer establishes, manages, and terminates connections between applications. It coordinates communication, maintains dialogs, and supports synchronization during data exchange.",
        ),
        Passage::new(
            6,
            "Presentation",
            "The Presentation layer translates data into a format that applications can interpret and use. It manages encryption, compression, and character encoding to maintain compatibility between systems.",
        ),
        Passage::new(
            7,
            "Application",
            "The Application layer provides direct interfaces for user interaction with network services. It supports functions such as email, file transfer, and web browsing, enabling meaningful communication.",
        ),
    ]
}
