use serenity::model::id::ApplicationId;

/// An embedded application that can be launched in a voice channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    /// Stable key used as the command choice value
    pub key: &'static str,
    id: u64,
    /// Display name shown to users
    pub name: &'static str,
}

impl Activity {
    #[inline]
    pub fn application_id(&self) -> ApplicationId { ApplicationId::new(self.id) }
}

pub static ACTIVITIES: [Activity; 4] = [
    Activity {
        key: "poker",
        id: 755_827_207_812_677_713,
        name: "Poker Night",
    },
    Activity {
        key: "betrayal",
        id: 773_336_526_917_861_400,
        name: "Betrayal.io",
    },
    Activity {
        key: "youtube",
        id: 755_600_276_941_176_913,
        name: "YouTube Together",
    },
    Activity {
        key: "fishing",
        id: 814_288_819_477_020_702,
        name: "Fishington.io",
    },
];

pub fn find(key: &str) -> Option<&'static Activity> { ACTIVITIES.iter().find(|a| a.key == key) }
