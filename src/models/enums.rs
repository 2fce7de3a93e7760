use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// Season and story genres keep the uppercase wire form of the mobile API;
// the group vocabularies use the repository's snake_case tokens.

str_enum!(Season {
    Spring => "SPRING",
    Summer => "SUMMER",
    Fall => "FALL",
    Winter => "WINTER",
});

str_enum!(StoryGenre {
    Myth => "MYTH",
    Science => "SCIENCE",
    History => "HISTORY",
    Art => "ART",
    Episode => "EPISODE",
});

str_enum!(CategoryGroup {
    FlowersAndGrasses => "flowers_and_grasses",
    TreesAndLandscape => "trees_and_landscape",
    IndoorDecor => "indoor_decor",
    KitchenGarden => "kitchen_garden",
});

str_enum!(FlowerGroup {
    LoveConfession => "love_confession",
    ComfortSorrow => "comfort_sorrow",
    GratitudeRespect => "gratitude_respect",
    PartingLonging => "parting_longing",
    HappinessJoy => "happiness_joy",
});

str_enum!(ColorGroup {
    WhiteCream => "white_cream",
    YellowOrange => "yellow_orange",
    RedPink => "red_pink",
    Blue => "blue",
    BrownBlack => "brown_black",
});

str_enum!(ScentGroup {
    SweetFloral => "sweet_floral",
    FreshCool => "fresh_cool",
    SoftCalm => "soft_calm",
    Unscented => "unscented",
});

str_enum!(IdentificationConfidence {
    High => "high",
    Medium => "medium",
    Low => "low",
});
