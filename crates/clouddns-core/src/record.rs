//! Record and zone value types
//!
//! Both types are plain values built once per invocation and handed to the
//! reconciler by value. The serde field names are the wire format printed by
//! the CLI (`RType`, `RData`, `RKey`, `TTL`), so field order matters here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default TTL in seconds for records created from the CLI
pub const DEFAULT_TTL: u32 = 60;

/// Desired or observed state of one resource record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record type code (e.g. "A", "AAAA", "CNAME")
    #[serde(rename = "RType")]
    pub record_type: String,

    /// Record value set, in order
    #[serde(rename = "RData")]
    pub data: Vec<String>,

    /// Fully-qualified record name (e.g. "api.example.com.")
    #[serde(rename = "RKey")]
    pub key: String,

    /// Time-to-live in seconds
    #[serde(rename = "TTL")]
    pub ttl: u32,
}

impl Record {
    /// Create a new record
    pub fn new(
        key: impl Into<String>,
        record_type: impl Into<String>,
        data: Vec<String>,
        ttl: u32,
    ) -> Self {
        Self {
            record_type: record_type.into(),
            data,
            key: key.into(),
            ttl,
        }
    }

    /// Validate the record before it is sent to a backend
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.key.is_empty() {
            return Err(crate::Error::invalid_input("record key cannot be empty"));
        }
        if self.record_type.is_empty() {
            return Err(crate::Error::invalid_input("record type cannot be empty"));
        }
        if self.data.is_empty() {
            return Err(crate::Error::invalid_input(format!(
                "record {} has no data",
                self.key
            )));
        }
        if self.ttl == 0 {
            return Err(crate::Error::invalid_input(format!(
                "record {} must have a positive TTL",
                self.key
            )));
        }
        Ok(())
    }
}

/// Identifies the managed zone a recorder operates on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDescriptor {
    /// DNS domain served by the zone (e.g. "w.uname.link.")
    #[serde(rename = "Domain")]
    pub domain: String,

    /// Owning cloud project
    #[serde(rename = "ProjectId")]
    pub project: String,

    /// Zone resource name within the project (e.g. "w-uname-link")
    #[serde(rename = "ManagedZone")]
    pub managed_zone: String,
}

impl ZoneDescriptor {
    /// Create a new zone descriptor
    pub fn new(
        domain: impl Into<String>,
        project: impl Into<String>,
        managed_zone: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            project: project.into(),
            managed_zone: managed_zone.into(),
        }
    }

    /// A zone must name its managed zone before anything touches a backend
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.managed_zone.is_empty() {
            return Err(crate::Error::config("managed zone cannot be empty"));
        }
        Ok(())
    }
}

/// DNS resource record type
///
/// Used by the CLI to normalize user input. Codes outside the known set are
/// passed through upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordType {
    /// IPv4 address
    A,
    /// IPv6 address
    Aaaa,
    /// Canonical name
    Cname,
    /// Text
    Txt,
    /// Mail exchanger
    Mx,
    /// Name server
    Ns,
    /// Pointer
    Ptr,
    /// Service locator
    Srv,
    /// Certification authority authorization
    Caa,
    /// Any other type code
    Other(String),
}

impl FromStr for RecordType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        let rtype = match code.as_str() {
            "" => return Err(crate::Error::invalid_input("record type cannot be empty")),
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "CNAME" => RecordType::Cname,
            "TXT" => RecordType::Txt,
            "MX" => RecordType::Mx,
            "NS" => RecordType::Ns,
            "PTR" => RecordType::Ptr,
            "SRV" => RecordType::Srv,
            "CAA" => RecordType::Caa,
            _ => RecordType::Other(code),
        };
        Ok(rtype)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Txt => "TXT",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Srv => "SRV",
            RecordType::Caa => "CAA",
            RecordType::Other(code) => code,
        };
        f.write_str(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_record() -> Record {
        Record::new(
            "api.w.uname.link.",
            "A",
            vec!["10.10.10.10".to_string()],
            DEFAULT_TTL,
        )
    }

    #[test]
    fn test_record_wire_format() {
        let json = serde_json::to_string(&api_record()).unwrap();
        assert_eq!(
            json,
            r#"{"RType":"A","RData":["10.10.10.10"],"RKey":"api.w.uname.link.","TTL":60}"#
        );
    }

    #[test]
    fn test_record_json_round_trip() {
        let record = Record::new(
            "mail.example.com.",
            "MX",
            vec!["10 mx1.example.com.".to_string(), "20 mx2.example.com.".to_string()],
            3600,
        );
        let json = serde_json::to_string(&record).unwrap();
        let parsed: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_zone_json_round_trip() {
        let zone = ZoneDescriptor::new("w.uname.link.", "my-project", "w-uname-link");
        let json = serde_json::to_string(&zone).unwrap();
        assert!(json.contains(r#""ManagedZone":"w-uname-link""#));
        let parsed: ZoneDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, zone);
    }

    #[test]
    fn test_record_validation() {
        assert!(api_record().validate().is_ok());

        let mut no_key = api_record();
        no_key.key.clear();
        assert!(matches!(no_key.validate(), Err(crate::Error::InvalidInput(_))));

        let mut no_data = api_record();
        no_data.data.clear();
        assert!(no_data.validate().is_err());

        let mut zero_ttl = api_record();
        zero_ttl.ttl = 0;
        assert!(zero_ttl.validate().is_err());
    }

    #[test]
    fn test_zone_requires_managed_zone() {
        assert!(ZoneDescriptor::new("example.com.", "p", "example-com").validate().is_ok());
        let err = ZoneDescriptor::new("example.com.", "p", "").validate().unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_record_type_normalization() {
        assert_eq!("a".parse::<RecordType>().unwrap(), RecordType::A);
        assert_eq!("aaaa".parse::<RecordType>().unwrap().to_string(), "AAAA");
        assert_eq!(
            "https".parse::<RecordType>().unwrap(),
            RecordType::Other("HTTPS".to_string())
        );
        assert!("  ".parse::<RecordType>().is_err());
    }
}
