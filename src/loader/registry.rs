// The four guitar recordings everything is pitched from. Swapping the timbre
// means swapping these files; the pitches have to stay put.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleName {
    E2,
    E3,
    E4,
    E5,
}

impl SampleName {
    pub fn as_str(self) -> &'static str {
        match self {
            SampleName::E2 => "E2",
            SampleName::E3 => "E3",
            SampleName::E4 => "E4",
            SampleName::E5 => "E5",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleDef {
    pub name: SampleName,
    pub midi: i32,              // fundamental pitch of the recording
    pub location: &'static str, // relative to the sample source
}

pub const GUITAR_SAMPLES: [SampleDef; 4] = [
    SampleDef { name: SampleName::E2, midi: 40, location: "E2.wav" },
    SampleDef { name: SampleName::E3, midi: 52, location: "E3.wav" },
    SampleDef { name: SampleName::E4, midi: 64, location: "E4.wav" },
    SampleDef { name: SampleName::E5, midi: 76, location: "E5.wav" },
];
