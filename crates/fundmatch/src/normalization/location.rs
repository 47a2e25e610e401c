use super::{clean_text, mentions_any};

struct CountryEntry {
    name: &'static str,
    code: &'static str,
    eu_member: bool,
    aliases: &'static [&'static str],
}

struct RegionEntry {
    name: &'static str,
    country: &'static str,
    aliases: &'static [&'static str],
}

const COUNTRIES: &[CountryEntry] = &[
    CountryEntry { name: "austria", code: "at", eu_member: true, aliases: &["austria", "österreich", "austrian"] },
    CountryEntry { name: "germany", code: "de", eu_member: true, aliases: &["germany", "deutschland", "german"] },
    CountryEntry { name: "switzerland", code: "ch", eu_member: false, aliases: &["switzerland", "schweiz", "swiss"] },
    CountryEntry { name: "italy", code: "it", eu_member: true, aliases: &["italy", "italia", "italien"] },
    CountryEntry { name: "france", code: "fr", eu_member: true, aliases: &["france", "frankreich", "french"] },
    CountryEntry { name: "netherlands", code: "nl", eu_member: true, aliases: &["netherlands", "niederlande", "dutch"] },
    CountryEntry { name: "belgium", code: "be", eu_member: true, aliases: &["belgium", "belgien"] },
    CountryEntry { name: "spain", code: "es", eu_member: true, aliases: &["spain", "spanien"] },
    CountryEntry { name: "czechia", code: "cz", eu_member: true, aliases: &["czechia", "czech republic", "tschechien"] },
    CountryEntry { name: "slovenia", code: "si", eu_member: true, aliases: &["slovenia", "slowenien"] },
    CountryEntry { name: "hungary", code: "hu", eu_member: true, aliases: &["hungary", "ungarn"] },
    CountryEntry { name: "poland", code: "pl", eu_member: true, aliases: &["poland", "polen"] },
    CountryEntry { name: "united kingdom", code: "uk", eu_member: false, aliases: &["united kingdom", "great britain", "england"] },
];

const REGIONS: &[RegionEntry] = &[
    RegionEntry { name: "vienna", country: "austria", aliases: &["vienna", "wien"] },
    RegionEntry { name: "upper austria", country: "austria", aliases: &["upper austria", "oberösterreich"] },
    RegionEntry { name: "lower austria", country: "austria", aliases: &["lower austria", "niederösterreich"] },
    RegionEntry { name: "tyrol", country: "austria", aliases: &["tyrol", "tirol"] },
    RegionEntry { name: "salzburg", country: "austria", aliases: &["salzburg"] },
    RegionEntry { name: "styria", country: "austria", aliases: &["styria", "steiermark"] },
    RegionEntry { name: "carinthia", country: "austria", aliases: &["carinthia", "kärnten"] },
    RegionEntry { name: "vorarlberg", country: "austria", aliases: &["vorarlberg"] },
    RegionEntry { name: "burgenland", country: "austria", aliases: &["burgenland"] },
    RegionEntry { name: "bavaria", country: "germany", aliases: &["bavaria", "bayern"] },
    RegionEntry { name: "berlin", country: "germany", aliases: &["berlin"] },
];

const EU_TERMS: &[&str] = &["eu", "europe", "european", "europa", "member state"];
const INTERNATIONAL_TERMS: &[&str] = &["international", "global", "worldwide", "any country"];

/// Geographic area at one level of the region ⊂ country ⊂ EU ⊂ international hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Area {
    International,
    Eu,
    Country(&'static str),
    Region(&'static str),
}

impl Area {
    fn country(self) -> Option<&'static str> {
        match self {
            Area::Country(name) => Some(name),
            Area::Region(name) => REGIONS
                .iter()
                .find(|region| region.name == name)
                .map(|region| region.country),
            _ => None,
        }
    }

    fn in_eu(self) -> bool {
        self.country()
            .and_then(|name| COUNTRIES.iter().find(|country| country.name == name))
            .is_some_and(|country| country.eu_member)
    }

    /// True when every place in `other` also lies in `self`.
    pub fn contains(self, other: Area) -> bool {
        match (self, other) {
            (Area::International, _) => true,
            (Area::Eu, Area::Eu) => true,
            (Area::Eu, area) => area.in_eu(),
            (Area::Country(name), Area::Country(other_name)) => name == other_name,
            (Area::Country(name), region @ Area::Region(_)) => region.country() == Some(name),
            (Area::Region(name), Area::Region(other_name)) => name == other_name,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLocation {
    pub areas: Vec<Area>,
}

impl NormalizedLocation {
    fn push(&mut self, area: Area) {
        if !self.areas.contains(&area) {
            self.areas.push(area);
        }
    }
}

pub fn normalize_location(raw: &str) -> Option<NormalizedLocation> {
    let mut text = clean_text(raw);
    let mut location = NormalizedLocation { areas: Vec::new() };

    for region in REGIONS {
        for alias in region.aliases {
            if text.contains(alias) {
                location.push(Area::Region(region.name));
                text = text.replace(alias, " ");
            }
        }
    }

    let segments: Vec<&str> = text
        .split([',', ';', '/', '|'])
        .map(str::trim)
        .collect();

    for country in COUNTRIES {
        let named = country.aliases.iter().any(|alias| text.contains(alias));
        let coded = segments.iter().any(|segment| *segment == country.code);
        if named || coded {
            location.push(Area::Country(country.name));
        }
    }

    if mentions_any(&text, EU_TERMS) {
        location.push(Area::Eu);
    }
    if mentions_any(&text, INTERNATIONAL_TERMS) {
        location.push(Area::International);
    }

    (!location.areas.is_empty()).then_some(location)
}

/// The program's area must contain the user's. A user answering with a wider EU or country
/// area also matches programs inside it, but an international applicant only matches
/// programs open internationally. Either side missing means unconstrained.
pub fn match_location(user: Option<&NormalizedLocation>, program: Option<&NormalizedLocation>) -> bool {
    let (Some(user), Some(program)) = (user, program) else {
        return true;
    };

    user.areas.iter().any(|user_area| {
        program.areas.iter().any(|program_area| {
            program_area.contains(*user_area)
                || (*user_area != Area::International && user_area.contains(*program_area))
        })
    })
}
