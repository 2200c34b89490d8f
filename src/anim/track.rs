use super::interpolate::Interpolate;

#[derive(Clone, Copy, Debug)]
pub struct Key<V> {
    pub time: f32,
    pub value: V,
}

/// Time-stamped samples for a single channel of a single node. Key times are
/// kept strictly increasing; inserting at an existing time replaces the value.
#[derive(Clone, Debug)]
pub struct Track<V: Interpolate> {
    keys: Vec<Key<V>>,
}

impl<V: Interpolate> Default for Track<V> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<V: Interpolate> Track<V> {
    pub fn from_samples(samples: impl IntoIterator<Item = (f32, V)>) -> Self {
        let mut keys: Vec<Key<V>> = samples
            .into_iter()
            .map(|(time, value)| Key { time, value })
            .collect();

        // stable sort + last-wins dedup
        keys.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap());
        keys.reverse();
        keys.dedup_by(|a, b| a.time == b.time);
        keys.reverse();

        Self { keys }
    }

    pub fn insert(&mut self, time: f32, value: V) {
        match self
            .keys
            .binary_search_by(|key| key.time.partial_cmp(&time).unwrap())
        {
            Ok(i) => self.keys[i].value = value,             // last wins
            Err(i) => self.keys.insert(i, Key { time, value }), // keep sorted
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Times of the first and last key, if any.
    pub fn time_bounds(&self) -> Option<(f32, f32)> {
        match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => Some((first.time, last.time)),
            _ => None,
        }
    }

    /// Interpolated value at `time`. An empty track has no opinion; the
    /// caller substitutes the node's rest component.
    ///
    /// If `looping`, time wraps into `[first, last)` so a query past the last
    /// key brackets back around to the first, which gives cyclic playback
    /// without a loop flag on the data. Otherwise time clamps to the key
    /// range.
    pub fn sample(&self, time: f32, looping: bool) -> Option<V> {
        if self.keys.is_empty() {
            return None;
        }

        if self.keys.len() == 1 {
            return Some(self.keys[0].value);
        }

        let first = self.keys[0].time;
        let last = self.keys[self.keys.len() - 1].time;

        let t = if looping && last > first {
            first + (time - first).rem_euclid(last - first)
        } else {
            time.clamp(first, last)
        };

        if t <= first {
            return Some(self.keys[0].value);
        }
        if t >= last {
            return Some(self.keys[self.keys.len() - 1].value);
        }

        let i = self.keys.partition_point(|key| key.time <= t);
        let left = &self.keys[i - 1];
        let right = &self.keys[i];

        let span = right.time - left.time;
        // Coincident key times cannot survive insert/from_samples, but a
        // zero-length interval must still never divide.
        let n = if span > 0.0 {
            ((t - left.time) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Some(V::interpolate(left.value, right.value, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[inline]
    fn approx_f(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }
    #[inline]
    fn approx_v3(a: Vec3, b: Vec3) -> bool {
        approx_f(a.x, b.x) && approx_f(a.y, b.y) && approx_f(a.z, b.z)
    }
    #[inline]
    fn approx_q(a: Quat, b: Quat) -> bool {
        // Quats can differ by sign; compare via absolute dot near 1
        a.is_normalized() && b.is_normalized() && a.dot(b).abs() > 1.0 - 1e-4
    }

    #[test]
    fn interpolates_vec3_midpoint() {
        let mut t = Track::<Vec3>::default();
        t.insert(0.0, Vec3::new(0.0, 0.0, 0.0));
        t.insert(1.0, Vec3::new(10.0, 0.0, 0.0));

        let v = t.sample(0.5, false).unwrap();
        assert!(approx_v3(v, Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn exact_key_hit_returns_key_value() {
        let mut t = Track::<Vec3>::default();
        t.insert(0.0, Vec3::splat(1.0));
        t.insert(0.8, Vec3::splat(3.0));
        t.insert(1.2, Vec3::splat(7.0));

        let v = t.sample(0.8, false).unwrap();
        assert!(approx_v3(v, Vec3::splat(3.0)));

        let mut r = Track::<Quat>::default();
        r.insert(0.0, Quat::IDENTITY);
        r.insert(0.5, Quat::from_rotation_y(1.0));
        r.insert(1.0, Quat::from_rotation_y(2.0));
        assert!(approx_q(
            r.sample(0.5, false).unwrap(),
            Quat::from_rotation_y(1.0)
        ));
    }

    #[test]
    fn clamps_before_and_after_range() {
        let mut t = Track::<Vec3>::default();
        t.insert(0.2, Vec3::new(2.0, 0.0, 0.0));
        t.insert(0.6, Vec3::new(6.0, 0.0, 0.0));

        let v0 = t.sample(0.0, false).unwrap();
        assert!(approx_v3(v0, Vec3::new(2.0, 0.0, 0.0)));

        let v1 = t.sample(100.0, false).unwrap();
        assert!(approx_v3(v1, Vec3::new(6.0, 0.0, 0.0)));
    }

    #[test]
    fn looping_wraps_across_end() {
        let mut t = Track::<Vec3>::default();
        t.insert(0.0, Vec3::new(0.0, 0.0, 0.0));
        t.insert(1.0, Vec3::new(10.0, 0.0, 0.0));

        // 1.05 wraps to 0.05
        let v = t.sample(1.05, true).unwrap();
        assert!(approx_v3(v, Vec3::new(0.5, 0.0, 0.0)));

        // 1.9 wraps to 0.9
        let v2 = t.sample(1.9, true).unwrap();
        assert!(approx_v3(v2, Vec3::new(9.0, 0.0, 0.0)));
    }

    #[test]
    fn last_wins_on_duplicate_inserts() {
        let mut t = Track::<Vec3>::default();
        t.insert(0.0, Vec3::new(0.0, 0.0, 0.0));
        t.insert(0.5, Vec3::new(999.0, 0.0, 0.0)); // duplicate time
        t.insert(0.5, Vec3::new(5.0, 0.0, 0.0)); // last should win
        t.insert(1.0, Vec3::new(10.0, 0.0, 0.0));

        assert_eq!(t.len(), 3);
        let v = t.sample(0.5, false).unwrap();
        assert!(approx_v3(v, Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn from_samples_sorts_and_dedups() {
        let t = Track::from_samples([
            (1.0, Vec3::splat(10.0)),
            (0.0, Vec3::ZERO),
            (1.0, Vec3::splat(99.0)),
        ]);
        assert_eq!(t.len(), 2);
        // The later duplicate wins.
        assert!(approx_v3(t.sample(1.0, false).unwrap(), Vec3::splat(99.0)));
    }

    #[test]
    fn quaternion_shortest_arc_is_respected() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let b_flipped = Quat::from_xyzw(-b.x, -b.y, -b.z, -b.w);

        let mut t = Track::<Quat>::default();
        t.insert(0.0, a);
        t.insert(1.0, b_flipped); // same rotation as b, opposite hemisphere

        // Halfway should be ~45deg around Y
        let q_mid = t.sample(0.5, false).unwrap();
        let expected = a.slerp(b, 0.5);
        assert!(approx_q(q_mid, expected));
    }

    #[test]
    fn single_key_is_constant() {
        let mut t = Track::<Vec3>::default();
        t.insert(0.25, Vec3::splat(4.0));

        for time in [0.0, 0.25, 1.0, 100.0] {
            assert!(approx_v3(t.sample(time, true).unwrap(), Vec3::splat(4.0)));
        }
    }

    #[test]
    fn empty_track_has_no_value() {
        let t = Track::<Vec3>::default();
        assert!(t.sample(0.0, false).is_none());
        assert!(t.time_bounds().is_none());
    }
}
