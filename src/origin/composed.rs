use rand::Rng;

use super::{Origin, OriginKind, PhotoDescriptor};
use crate::http::Transport;

/// Every enabled origin, each equally likely to be asked for the next photo.
#[derive(Debug, Default)]
pub struct ComposedOrigin {
    origins: Vec<Origin>,
}

impl ComposedOrigin {
    pub fn new(origins: Vec<Origin>) -> Self {
        Self { origins }
    }

    pub fn from_kinds(kinds: &[OriginKind], galleries: &[String]) -> Self {
        Self::new(
            kinds
                .iter()
                .map(|&kind| Origin::from_kind(kind, galleries))
                .collect(),
        )
    }

    /// Chooses the origin to delegate to. Origins are weighted equally, regardless of how many
    /// galleries each of them happens to list.
    pub fn choose<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&mut Origin> {
        if self.origins.is_empty() {
            return None;
        }

        let idx = rng.gen_range(0..self.origins.len());
        self.origins.get_mut(idx)
    }

    pub fn photo<R: Rng + ?Sized>(
        &mut self,
        transport: &dyn Transport,
        rng: &mut R,
    ) -> Option<PhotoDescriptor> {
        let origin = self.choose(rng)?;
        log::info!("asking the {} origin for a photo", origin.kind());
        origin.photo(transport, rng)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::{rngs::StdRng, SeedableRng};

    use super::ComposedOrigin;
    use crate::{http::testing::FixtureTransport, origin::OriginKind};

    #[test]
    fn origins_are_chosen_uniformly() {
        let kinds = [
            OriginKind::Latest,
            OriginKind::Archive,
            OriginKind::Miscellaneous,
        ];
        let mut composed = ComposedOrigin::from_kinds(&kinds, &[]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<OriginKind, usize> = HashMap::new();

        let trials = 6000;
        for _ in 0..trials {
            let kind = composed.choose(&mut rng).unwrap().kind();
            *counts.entry(kind).or_default() += 1;
        }

        assert_eq!(3, counts.len());
        for kind in kinds {
            let share = counts[&kind] as f64 / trials as f64;
            assert!((0.30..0.37).contains(&share), "{}: {}", kind, share);
        }
    }

    #[test]
    fn no_origins_yields_no_photo() {
        let transport = FixtureTransport::new();
        let mut composed = ComposedOrigin::default();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(None, composed.photo(&transport, &mut rng));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn failing_origin_yields_no_photo() {
        let transport = FixtureTransport::new()
            .with_status("http://ngm.nationalgeographic.com/wallpaper/download", 503);
        let mut composed = ComposedOrigin::from_kinds(&[OriginKind::Archive], &[]);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(None, composed.photo(&transport, &mut rng));
        assert_eq!(1, transport.requests().len());
    }
}
