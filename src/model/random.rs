use rand::distributions::Open01;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

//source of uniform variates in the open interval (0, 1)
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;

    //fills the buffer in order
    fn fill(&mut self, buf: &mut [f64]) {
        for slot in buf.iter_mut() {
            *slot = self.next_uniform();
        }
    }
}

//pcg64 backed source
#[derive(Debug, Clone)]
pub struct SeededUniform {
    rng: Pcg64,
}

impl SeededUniform {
    pub fn new(seed: u64) -> Self {
        SeededUniform {
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    //an independent stream of the same seed
    pub fn with_stream(seed: u64, stream: u64) -> Self {
        SeededUniform {
            rng: Pcg64::new(seed as u128, stream as u128),
        }
    }
}

impl UniformSource for SeededUniform {
    fn next_uniform(&mut self) -> f64 {
        self.rng.sample(Open01)
    }
}

//always yields the same value
#[derive(Debug, Clone, Copy)]
pub struct ConstantUniform(pub f64);

impl UniformSource for ConstantUniform {
    fn next_uniform(&mut self) -> f64 {
        self.0
    }
}

//replays a fixed sequence, wrapping around at the end
//an empty sequence has nothing to replay and is rejected
#[derive(Debug, Clone)]
pub struct SequenceUniform {
    values: Vec<f64>,
    position: usize,
}

impl SequenceUniform {
    pub fn new(values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(SequenceUniform {
            values,
            position: 0,
        })
    }
}

impl UniformSource for SequenceUniform {
    fn next_uniform(&mut self) -> f64 {
        let value = self.values[self.position];
        self.position = (self.position + 1) % self.values.len();
        value
    }
}

//hands every simulation trial its own uniform stream
//a trial's stream depends only on its index, so adding trials only adds columns
pub trait TrialStreams: Sync {
    type Source: UniformSource;

    fn stream(&self, trial: usize) -> Self::Source;
}

//trial c draws from pcg stream c of the base seed
#[derive(Debug, Clone, Copy)]
pub struct PcgTrialStreams {
    pub seed: u64,
}

impl PcgTrialStreams {
    pub fn new(seed: u64) -> Self {
        PcgTrialStreams { seed }
    }

    //picks a fresh base seed from entropy
    pub fn from_entropy() -> Self {
        PcgTrialStreams {
            seed: rand::thread_rng().gen(),
        }
    }
}

impl TrialStreams for PcgTrialStreams {
    type Source = SeededUniform;

    fn stream(&self, trial: usize) -> SeededUniform {
        SeededUniform::with_stream(self.seed, trial as u64)
    }
}

//every trial yields the same constant uniform
#[derive(Debug, Clone, Copy)]
pub struct ConstantStreams(pub f64);

impl TrialStreams for ConstantStreams {
    type Source = ConstantUniform;

    fn stream(&self, _trial: usize) -> ConstantUniform {
        ConstantUniform(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_uniform_deterministic() {
        let mut a = SeededUniform::new(42);
        let mut b = SeededUniform::new(42);

        for _ in 0..100 {
            assert_eq!(a.next_uniform(), b.next_uniform());
        }
    }

    #[test]
    fn test_seeded_uniform_open_interval() {
        let mut source = SeededUniform::new(7);
        let mut buf = vec![0.0; 10_000];
        source.fill(&mut buf);

        assert!(buf.iter().all(|&u| u > 0.0 && u < 1.0));
    }

    #[test]
    fn test_trial_streams_are_independent() {
        let streams = PcgTrialStreams::new(42);
        let mut first = streams.stream(0);
        let mut second = streams.stream(1);

        let a: Vec<f64> = (0..8).map(|_| first.next_uniform()).collect();
        let b: Vec<f64> = (0..8).map(|_| second.next_uniform()).collect();
        assert_ne!(a, b);

        let mut again = streams.stream(1);
        let c: Vec<f64> = (0..8).map(|_| again.next_uniform()).collect();
        assert_eq!(b, c);
    }

    #[test]
    fn test_sequence_wraps() {
        let mut source = SequenceUniform::new(vec![0.1, 0.2]).unwrap();
        assert_eq!(source.next_uniform(), 0.1);
        assert_eq!(source.next_uniform(), 0.2);
        assert_eq!(source.next_uniform(), 0.1);
    }

    #[test]
    fn test_empty_sequence_rejected() {
        assert!(SequenceUniform::new(Vec::new()).is_none());
    }
}
