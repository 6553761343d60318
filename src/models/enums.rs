use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
///
/// Wire form is the string literal, so the browser sends and receives the
/// same identifiers it uses for element names.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(StageId {
    Patient => "patient",
    EegFindings => "eeg-findings",
    SeizureFindings => "seizure-findings",
    Annotations => "annotations",
    AdditionalNotes => "additional-notes",
    Signature => "signature",
    Preview => "preview",
});

str_enum!(Section {
    Patient => "patient",
    EegFindings => "eegFindings",
    SeizureFindings => "seizureFindings",
    Annotations => "annotations",
    AdditionalNotes => "additionalNotes",
    Signature => "signature",
});

str_enum!(PatientField {
    Name => "name",
    Uhid => "uhid",
    Age => "age",
    Gender => "gender",
    Dob => "dob",
    AbhaId => "abhaId",
    Height => "height",
    Weight => "weight",
    Address => "address",
    ReferringDoctor => "referringDoctor",
    Department => "department",
    ClinicalIndication => "clinicalIndication",
    LastEpisode => "lastEpisode",
    EpisodeFrequency => "episodeFrequency",
    MedicationFrequency => "medicationFrequency",
    PatientHistory => "patientHistory",
    RecentCtScan => "recentCTScan",
    CtScanResult => "ctScanResult",
    CtScanComment => "ctScanComment",
    RecentMriScan => "recentMRIScan",
    MriScanResult => "mriScanResult",
    MriScanComment => "mriScanComment",
});

str_enum!(BackgroundField {
    OtherElements => "otherElements",
    Amplitude => "amplitude",
    Symmetry => "symmetry",
    Reactivity => "reactivity",
});

str_enum!(EegTagGroup {
    EegElements => "eegElements",
    SleepStages => "sleepStages",
    SleepCharacteristics => "sleepCharacteristics",
    SleepAbnormalities => "sleepAbnormalities",
    BiologicalArtifacts => "biological",
    NonBiologicalArtifacts => "nonBiological",
});

str_enum!(PatternField {
    Type => "type",
    Subtype => "subtype",
    Rhythmic => "rhythmic",
    Periodic => "periodic",
    Prevalence => "prevalence",
});

str_enum!(SeizureField {
    Classification => "classification",
    Subtype => "subtype",
    Duration => "duration",
});

str_enum!(SeizureTagGroup {
    ClinicalSigns => "clinicalSigns",
    EegPattern => "eegPattern",
    PostictalSigns => "postictalSigns",
});

str_enum!(AnnotationField {
    Timestamp => "timestamp",
    Description => "description",
});

str_enum!(NotesField {
    Notes => "notes",
    Recommendations => "recommendations",
});

str_enum!(SignatureField {
    DoctorName => "doctorName",
    Designation => "designation",
    Date => "date",
});
