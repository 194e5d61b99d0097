use std::fmt;

/// Anything that can name a single object in a region-scoped bucket.
///
/// [`Location`] is the stock implementation. Implement this on your own types
/// to hand them to [`Location::from_provider`] without reshaping them first.
pub trait LocationProvider {
    /// Region the bucket lives in (e.g. `us-east-1`).
    fn region(&self) -> &str;

    /// Bucket name.
    fn bucket(&self) -> &str;

    /// Object key inside the bucket.
    fn key(&self) -> &str;
}

/// One place an object may be read from or written to.
///
/// Immutable once built; compare by value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    region: String,
    bucket: String,
    key: String,
}

impl Location {
    pub fn new(
        region: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Copy the coordinates out of any [`LocationProvider`].
    pub fn from_provider<P: LocationProvider + ?Sized>(provider: &P) -> Self {
        Self::new(provider.region(), provider.bucket(), provider.key())
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl LocationProvider for Location {
    fn region(&self) -> &str {
        &self.region
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.region, self.bucket, self.key)
    }
}

/// Priority-ordered candidate locations for one logical object.
///
/// Always holds at least the preferred location. Alternates are appended in
/// the order they should be tried and are never reordered.
///
/// ```
/// use stowage_failover::{Location, Locations};
///
/// let locations = Locations::new(Location::new("us-east-1", "assets-east", "img/logo.png"))
///     .with_alternative(Location::new("us-west-1", "assets-west", "img/logo.png"));
///
/// assert_eq!(locations.len(), 2);
/// assert_eq!(locations.preferred().region(), "us-east-1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locations {
    locations: Vec<Location>,
}

impl Locations {
    /// Create a set holding only the preferred location.
    pub fn new(preferred: Location) -> Self {
        Self {
            locations: vec![preferred],
        }
    }

    /// Append an alternate, tried after every location already present.
    pub fn add_alternative(&mut self, location: Location) -> &mut Self {
        self.locations.push(location);
        self
    }

    /// Builder form of [`add_alternative`](Self::add_alternative).
    pub fn with_alternative(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    /// The first, most preferred location.
    pub fn preferred(&self) -> &Location {
        &self.locations[0]
    }

    /// Number of candidate locations. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.locations.iter()
    }

    pub fn as_slice(&self) -> &[Location] {
        &self.locations
    }
}

impl<'a> IntoIterator for &'a Locations {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}
