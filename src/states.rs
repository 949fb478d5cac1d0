/// Postal-code lookup for U.S. states, DC and Puerto Rico.
///
/// The hospital facility table keys rows by two-letter postal code while the
/// population table and the case feed use full names. This module is the
/// single mapping between the two; codes outside it (Guam, the Virgin
/// Islands, military codes, ...) have no full name and are excluded from
/// joins by the hospital loader.

use std::fmt;

/// A state-level jurisdiction known to the postal-code lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UsState {
    Alabama,
    Alaska,
    Arizona,
    Arkansas,
    California,
    Colorado,
    Connecticut,
    Delaware,
    DistrictOfColumbia,
    Florida,
    Georgia,
    Hawaii,
    Idaho,
    Illinois,
    Indiana,
    Iowa,
    Kansas,
    Kentucky,
    Louisiana,
    Maine,
    Maryland,
    Massachusetts,
    Michigan,
    Minnesota,
    Mississippi,
    Missouri,
    Montana,
    Nebraska,
    Nevada,
    NewHampshire,
    NewJersey,
    NewMexico,
    NewYork,
    NorthCarolina,
    NorthDakota,
    Ohio,
    Oklahoma,
    Oregon,
    Pennsylvania,
    PuertoRico,
    RhodeIsland,
    SouthCarolina,
    SouthDakota,
    Tennessee,
    Texas,
    Utah,
    Vermont,
    Virginia,
    Washington,
    WestVirginia,
    Wisconsin,
    Wyoming,
}

impl UsState {
    /// Every entry in the lookup, ordered by full name.
    pub const ALL: [UsState; 52] = [
        UsState::Alabama,
        UsState::Alaska,
        UsState::Arizona,
        UsState::Arkansas,
        UsState::California,
        UsState::Colorado,
        UsState::Connecticut,
        UsState::Delaware,
        UsState::DistrictOfColumbia,
        UsState::Florida,
        UsState::Georgia,
        UsState::Hawaii,
        UsState::Idaho,
        UsState::Illinois,
        UsState::Indiana,
        UsState::Iowa,
        UsState::Kansas,
        UsState::Kentucky,
        UsState::Louisiana,
        UsState::Maine,
        UsState::Maryland,
        UsState::Massachusetts,
        UsState::Michigan,
        UsState::Minnesota,
        UsState::Mississippi,
        UsState::Missouri,
        UsState::Montana,
        UsState::Nebraska,
        UsState::Nevada,
        UsState::NewHampshire,
        UsState::NewJersey,
        UsState::NewMexico,
        UsState::NewYork,
        UsState::NorthCarolina,
        UsState::NorthDakota,
        UsState::Ohio,
        UsState::Oklahoma,
        UsState::Oregon,
        UsState::Pennsylvania,
        UsState::PuertoRico,
        UsState::RhodeIsland,
        UsState::SouthCarolina,
        UsState::SouthDakota,
        UsState::Tennessee,
        UsState::Texas,
        UsState::Utah,
        UsState::Vermont,
        UsState::Virginia,
        UsState::Washington,
        UsState::WestVirginia,
        UsState::Wisconsin,
        UsState::Wyoming,
    ];

    /// Two-letter postal code.
    pub fn code(&self) -> &'static str {
        match self {
            UsState::Alabama => "AL",
            UsState::Alaska => "AK",
            UsState::Arizona => "AZ",
            UsState::Arkansas => "AR",
            UsState::California => "CA",
            UsState::Colorado => "CO",
            UsState::Connecticut => "CT",
            UsState::Delaware => "DE",
            UsState::DistrictOfColumbia => "DC",
            UsState::Florida => "FL",
            UsState::Georgia => "GA",
            UsState::Hawaii => "HI",
            UsState::Idaho => "ID",
            UsState::Illinois => "IL",
            UsState::Indiana => "IN",
            UsState::Iowa => "IA",
            UsState::Kansas => "KS",
            UsState::Kentucky => "KY",
            UsState::Louisiana => "LA",
            UsState::Maine => "ME",
            UsState::Maryland => "MD",
            UsState::Massachusetts => "MA",
            UsState::Michigan => "MI",
            UsState::Minnesota => "MN",
            UsState::Mississippi => "MS",
            UsState::Missouri => "MO",
            UsState::Montana => "MT",
            UsState::Nebraska => "NE",
            UsState::Nevada => "NV",
            UsState::NewHampshire => "NH",
            UsState::NewJersey => "NJ",
            UsState::NewMexico => "NM",
            UsState::NewYork => "NY",
            UsState::NorthCarolina => "NC",
            UsState::NorthDakota => "ND",
            UsState::Ohio => "OH",
            UsState::Oklahoma => "OK",
            UsState::Oregon => "OR",
            UsState::Pennsylvania => "PA",
            UsState::PuertoRico => "PR",
            UsState::RhodeIsland => "RI",
            UsState::SouthCarolina => "SC",
            UsState::SouthDakota => "SD",
            UsState::Tennessee => "TN",
            UsState::Texas => "TX",
            UsState::Utah => "UT",
            UsState::Vermont => "VT",
            UsState::Virginia => "VA",
            UsState::Washington => "WA",
            UsState::WestVirginia => "WV",
            UsState::Wisconsin => "WI",
            UsState::Wyoming => "WY",
        }
    }

    /// Full display name, as used by the population table and case feed.
    pub fn name(&self) -> &'static str {
        match self {
            UsState::Alabama => "Alabama",
            UsState::Alaska => "Alaska",
            UsState::Arizona => "Arizona",
            UsState::Arkansas => "Arkansas",
            UsState::California => "California",
            UsState::Colorado => "Colorado",
            UsState::Connecticut => "Connecticut",
            UsState::Delaware => "Delaware",
            UsState::DistrictOfColumbia => "District of Columbia",
            UsState::Florida => "Florida",
            UsState::Georgia => "Georgia",
            UsState::Hawaii => "Hawaii",
            UsState::Idaho => "Idaho",
            UsState::Illinois => "Illinois",
            UsState::Indiana => "Indiana",
            UsState::Iowa => "Iowa",
            UsState::Kansas => "Kansas",
            UsState::Kentucky => "Kentucky",
            UsState::Louisiana => "Louisiana",
            UsState::Maine => "Maine",
            UsState::Maryland => "Maryland",
            UsState::Massachusetts => "Massachusetts",
            UsState::Michigan => "Michigan",
            UsState::Minnesota => "Minnesota",
            UsState::Mississippi => "Mississippi",
            UsState::Missouri => "Missouri",
            UsState::Montana => "Montana",
            UsState::Nebraska => "Nebraska",
            UsState::Nevada => "Nevada",
            UsState::NewHampshire => "New Hampshire",
            UsState::NewJersey => "New Jersey",
            UsState::NewMexico => "New Mexico",
            UsState::NewYork => "New York",
            UsState::NorthCarolina => "North Carolina",
            UsState::NorthDakota => "North Dakota",
            UsState::Ohio => "Ohio",
            UsState::Oklahoma => "Oklahoma",
            UsState::Oregon => "Oregon",
            UsState::Pennsylvania => "Pennsylvania",
            UsState::PuertoRico => "Puerto Rico",
            UsState::RhodeIsland => "Rhode Island",
            UsState::SouthCarolina => "South Carolina",
            UsState::SouthDakota => "South Dakota",
            UsState::Tennessee => "Tennessee",
            UsState::Texas => "Texas",
            UsState::Utah => "Utah",
            UsState::Vermont => "Vermont",
            UsState::Virginia => "Virginia",
            UsState::Washington => "Washington",
            UsState::WestVirginia => "West Virginia",
            UsState::Wisconsin => "Wisconsin",
            UsState::Wyoming => "Wyoming",
        }
    }

    /// Looks up a state by postal code. Returns `None` for unknown codes.
    ///
    /// Surrounding whitespace is ignored; case is not.
    pub fn from_code(code: &str) -> Option<UsState> {
        let code = code.trim();
        UsState::ALL.iter().copied().find(|s| s.code() == code)
    }
}

impl fmt::Display for UsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Expands a postal code to its full state name, if known.
pub fn name_for_code(code: &str) -> Option<&'static str> {
    UsState::from_code(code).map(|s| s.name())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_codes_are_two_uppercase_letters() {
        for state in UsState::ALL {
            let code = state.code();
            assert_eq!(code.len(), 2, "code for '{}' should be 2 letters", state);
            assert!(
                code.chars().all(|c| c.is_ascii_uppercase()),
                "code for '{}' should be uppercase, got '{}'",
                state,
                code
            );
        }
    }

    #[test]
    fn test_codes_and_names_are_unique() {
        let codes: HashSet<_> = UsState::ALL.iter().map(|s| s.code()).collect();
        let names: HashSet<_> = UsState::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(codes.len(), UsState::ALL.len(), "duplicate postal code in lookup");
        assert_eq!(names.len(), UsState::ALL.len(), "duplicate state name in lookup");
    }

    #[test]
    fn test_from_code_round_trips_every_entry() {
        for state in UsState::ALL {
            assert_eq!(UsState::from_code(state.code()), Some(state));
        }
    }

    #[test]
    fn test_known_codes_expand() {
        assert_eq!(name_for_code("CA"), Some("California"));
        assert_eq!(name_for_code("DC"), Some("District of Columbia"));
        assert_eq!(name_for_code(" PR "), Some("Puerto Rico"));
    }

    #[test]
    fn test_unknown_codes_have_no_name() {
        assert_eq!(name_for_code("GU"), None);
        assert_eq!(name_for_code("VI"), None);
        assert_eq!(name_for_code("ca"), None);
        assert_eq!(name_for_code(""), None);
    }

    #[test]
    fn test_lookup_covers_fifty_states_dc_and_puerto_rico() {
        assert_eq!(UsState::ALL.len(), 52);
    }
}
