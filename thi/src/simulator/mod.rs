mod cache;

pub use cache::ImageCache;

use getset::{CopyGetters, Getters};

use thi_core::{
    common::Freq,
    grid::{Grid, GridOption},
    medium::Medium,
    mode::ImagingMode,
    phantom::{Phantom, PhantomOption},
    psf::Psf,
};

use crate::{
    error::SimulatorError,
    imaging::{DisplayImage, ForwardModel, ImagingOption},
    metrics::{Metrics, MetricsOption},
    profile::DepthProfiles,
};

/// The option of [`Simulator`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulatorOption {
    /// Imaging plane.
    pub grid: GridOption,
    /// Propagation medium.
    pub medium: Medium,
    /// Phantom generation.
    pub phantom: PhantomOption,
    /// Image formation.
    pub imaging: ImagingOption,
    /// Quality measurement.
    pub metrics: MetricsOption,
}

/// Stateful front end holding the current phantom and the last image of each mode.
///
/// [`create_phantom`](Self::create_phantom) replaces the phantom and drops every cached image.
/// Changing the medium or the imaging option also drops them, since they no longer describe
/// the current configuration.
///
/// Options are validated when they are set, so an invalid option never replaces a valid one.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Simulator {
    #[getset(get = "pub")]
    /// Imaging plane.
    grid: Grid,
    #[getset(get_copy = "pub")]
    /// Propagation medium.
    medium: Medium,
    #[getset(get = "pub")]
    /// Phantom generation option.
    phantom_option: PhantomOption,
    #[getset(get = "pub")]
    /// Image formation option.
    imaging_option: ImagingOption,
    #[getset(get = "pub")]
    /// Quality measurement option.
    metrics_option: MetricsOption,
    phantom: Option<Phantom>,
    cache: ImageCache,
}

impl Simulator {
    /// Creates a new [`Simulator`] without a phantom.
    pub fn new(option: SimulatorOption) -> Result<Self, SimulatorError> {
        let SimulatorOption {
            grid,
            medium,
            phantom,
            imaging,
            metrics,
        } = option;
        phantom.validate()?;
        imaging.validate()?;
        metrics.validate()?;
        Ok(Self {
            grid: Grid::new(&grid)?,
            medium,
            phantom_option: phantom,
            imaging_option: imaging,
            metrics_option: metrics,
            phantom: None,
            cache: ImageCache::default(),
        })
    }

    /// The current phantom, if one has been created.
    #[must_use]
    pub const fn phantom(&self) -> Option<&Phantom> {
        self.phantom.as_ref()
    }

    /// The last image formed in `mode` since the phantom was created.
    #[must_use]
    pub fn image(&self, mode: ImagingMode) -> Option<&DisplayImage> {
        self.cache.get(mode)
    }

    /// Sets the propagation medium and drops cached images.
    pub fn set_medium(&mut self, medium: Medium) {
        if self.medium != medium {
            self.cache.clear();
        }
        self.medium = medium;
    }

    /// Sets the phantom option used by the next [`create_phantom`](Self::create_phantom).
    pub fn set_phantom_option(&mut self, option: PhantomOption) -> Result<(), SimulatorError> {
        option.validate()?;
        self.phantom_option = option;
        Ok(())
    }

    /// Sets the image formation option and drops cached images.
    pub fn set_imaging_option(&mut self, option: ImagingOption) -> Result<(), SimulatorError> {
        option.validate()?;
        if self.imaging_option != option {
            self.cache.clear();
        }
        self.imaging_option = option;
        Ok(())
    }

    /// Sets the quality measurement option.
    pub fn set_metrics_option(&mut self, option: MetricsOption) -> Result<(), SimulatorError> {
        option.validate()?;
        self.metrics_option = option;
        Ok(())
    }

    /// Generates a new phantom and drops cached images.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn create_phantom(&mut self) -> Result<&Phantom, SimulatorError> {
        self.cache.clear();
        self.phantom = None;
        let phantom = Phantom::new(&self.grid, &self.phantom_option)?;
        Ok(self.phantom.insert(phantom))
    }

    /// Synthesizes the PSF of `mode`. Use [`Psf::kernel`] for the 2-D kernel.
    pub fn get_psf(
        &self,
        mode: ImagingMode,
        frequency: Freq,
        nonlinearity: f64,
    ) -> Result<Psf, SimulatorError> {
        Ok(Psf::new(
            mode,
            frequency,
            nonlinearity,
            &self.imaging_option.psf,
        )?)
    }

    /// Forms a display image of the current phantom and caches it.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn run_imaging(
        &mut self,
        mode: ImagingMode,
        frequency: Freq,
        nonlinearity: f64,
        pulse_inversion: bool,
    ) -> Result<DisplayImage, SimulatorError> {
        let phantom = self
            .phantom
            .as_ref()
            .ok_or(SimulatorError::PhantomNotCreated)?;
        let image = ForwardModel::new(&self.grid, &self.medium, &self.imaging_option).image(
            phantom,
            mode,
            frequency,
            nonlinearity,
            pulse_inversion,
        )?;
        self.cache.insert(image.clone());
        Ok(image)
    }

    /// Closed-form depth profiles over the imaging depth.
    pub fn get_profiles(
        &self,
        frequency: Freq,
        nonlinearity: f64,
    ) -> Result<DepthProfiles, SimulatorError> {
        Ok(DepthProfiles::new(
            self.grid.depth(),
            &self.medium,
            frequency,
            nonlinearity,
        )?)
    }

    /// Measures the cached fundamental and harmonic images.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_metrics(&self) -> Result<Metrics, SimulatorError> {
        let phantom = self
            .phantom
            .as_ref()
            .ok_or(SimulatorError::PhantomNotCreated)?;
        let image = |mode| {
            self.cache
                .get(mode)
                .ok_or(SimulatorError::ImageNotAvailable(mode))
        };
        Ok(Metrics::measure(
            &self.grid,
            phantom,
            image(ImagingMode::Fundamental)?,
            image(ImagingMode::Harmonic)?,
            &self.metrics_option,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use thi_core::{common::MHz, medium::Habitus, psf::PsfOption, ParameterError};

    #[rstest::fixture]
    fn sim() -> Simulator {
        Simulator::new(SimulatorOption {
            grid: GridOption {
                size: 64,
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn invalid_grid() {
        assert_eq!(
            Some(SimulatorError::Parameter(ParameterError::GridTooSmall(4, 8))),
            Simulator::new(SimulatorOption {
                grid: GridOption {
                    size: 4,
                    ..Default::default()
                },
                ..Default::default()
            })
            .err()
        );
    }

    #[rstest::rstest]
    fn imaging_requires_phantom(mut sim: Simulator) {
        assert_eq!(
            Err(SimulatorError::PhantomNotCreated),
            sim.run_imaging(ImagingMode::Harmonic, 3.5 * MHz, 0.35, false)
        );
        assert_eq!(Err(SimulatorError::PhantomNotCreated), sim.get_metrics());
    }

    #[rstest::rstest]
    fn metrics_require_both_images(mut sim: Simulator) -> anyhow::Result<()> {
        sim.create_phantom()?;
        assert_eq!(
            Err(SimulatorError::ImageNotAvailable(ImagingMode::Fundamental)),
            sim.get_metrics()
        );
        sim.run_imaging(ImagingMode::Fundamental, 3.5 * MHz, 0.35, false)?;
        assert_eq!(
            Err(SimulatorError::ImageNotAvailable(ImagingMode::Harmonic)),
            sim.get_metrics()
        );
        sim.run_imaging(ImagingMode::Harmonic, 3.5 * MHz, 0.35, false)?;
        assert!(sim.get_metrics().is_ok());
        Ok(())
    }

    #[rstest::rstest]
    fn run_imaging_caches_result(mut sim: Simulator) -> anyhow::Result<()> {
        sim.create_phantom()?;
        let image = sim.run_imaging(ImagingMode::Harmonic, 3.5 * MHz, 0.35, false)?;
        assert_eq!(Some(&image), sim.image(ImagingMode::Harmonic));
        assert!(sim.image(ImagingMode::Fundamental).is_none());

        let inverted = sim.run_imaging(ImagingMode::Harmonic, 3.5 * MHz, 0.35, true)?;
        assert_ne!(image, inverted);
        assert_eq!(Some(&inverted), sim.image(ImagingMode::Harmonic));
        Ok(())
    }

    #[rstest::rstest]
    fn create_phantom_clears_cache(mut sim: Simulator) -> anyhow::Result<()> {
        sim.create_phantom()?;
        sim.run_imaging(ImagingMode::Fundamental, 3.5 * MHz, 0.35, false)?;
        sim.run_imaging(ImagingMode::Harmonic, 3.5 * MHz, 0.35, false)?;
        sim.create_phantom()?;
        assert!(sim.image(ImagingMode::Fundamental).is_none());
        assert!(sim.image(ImagingMode::Harmonic).is_none());
        Ok(())
    }

    #[rstest::rstest]
    fn create_phantom_is_deterministic(mut sim: Simulator) -> anyhow::Result<()> {
        let a = sim.create_phantom()?.clone();
        let b = sim.create_phantom()?.clone();
        assert_eq!(a, b);
        Ok(())
    }

    #[rstest::rstest]
    fn phantom_option_applies_on_next_creation(mut sim: Simulator) -> anyhow::Result<()> {
        sim.create_phantom()?;
        sim.set_phantom_option(PhantomOption {
            num_lesions: 5,
            ..Default::default()
        })?;
        assert_eq!(3, sim.phantom().map_or(0, |p| p.lesions().len()));
        assert_eq!(5, sim.create_phantom()?.lesions().len());
        Ok(())
    }

    #[rstest::rstest]
    fn medium_change_clears_cache(mut sim: Simulator) -> anyhow::Result<()> {
        sim.create_phantom()?;
        sim.run_imaging(ImagingMode::Fundamental, 3.5 * MHz, 0.35, false)?;
        sim.set_medium(Medium::new());
        assert!(sim.image(ImagingMode::Fundamental).is_some());
        sim.set_medium(Medium::new().with_habitus(Habitus::Obese));
        assert!(sim.image(ImagingMode::Fundamental).is_none());
        assert!(sim.phantom().is_some());
        Ok(())
    }

    #[rstest::rstest]
    fn invalid_option_is_rejected_by_setter(mut sim: Simulator) -> anyhow::Result<()> {
        sim.create_phantom()?;
        sim.run_imaging(ImagingMode::Fundamental, 3.5 * MHz, 0.35, false)?;

        assert_eq!(
            Err(SimulatorError::Parameter(ParameterError::LesionCountOutOfRange(0, 5))),
            sim.set_phantom_option(PhantomOption {
                num_lesions: 0,
                ..Default::default()
            })
        );
        assert_eq!(
            Err(SimulatorError::Parameter(ParameterError::NoiseStdInvalid(-1.))),
            sim.set_imaging_option(ImagingOption {
                noise_std: -1.,
                ..Default::default()
            })
        );
        assert_eq!(
            Err(SimulatorError::Parameter(ParameterError::ExtentInvalid(0.))),
            sim.set_metrics_option(MetricsOption {
                resolution_depth: 0.,
                ..Default::default()
            })
        );

        assert_eq!(&PhantomOption::default(), sim.phantom_option());
        assert_eq!(&ImagingOption::default(), sim.imaging_option());
        assert_eq!(&MetricsOption::default(), sim.metrics_option());
        assert!(sim.image(ImagingMode::Fundamental).is_some());
        assert_eq!(3, sim.create_phantom()?.lesions().len());
        Ok(())
    }

    #[rstest::rstest]
    #[case(
        ParameterError::LesionCountOutOfRange(0, 5),
        SimulatorOption {
            phantom: PhantomOption { num_lesions: 0, ..Default::default() },
            ..Default::default()
        }
    )]
    #[case(
        ParameterError::PointTargetValueInvalid(-1.),
        SimulatorOption {
            phantom: PhantomOption { point_target_value: -1., ..Default::default() },
            ..Default::default()
        }
    )]
    #[case(
        ParameterError::NoiseStdInvalid(-1.),
        SimulatorOption {
            imaging: ImagingOption { noise_std: -1., ..Default::default() },
            ..Default::default()
        }
    )]
    #[case(
        ParameterError::DynamicRangeInvalid(0.),
        SimulatorOption {
            imaging: ImagingOption { dynamic_range: 0., ..Default::default() },
            ..Default::default()
        }
    )]
    #[case(
        ParameterError::KernelSizeInvalid(40),
        SimulatorOption {
            imaging: ImagingOption {
                psf: PsfOption { size: 40, ..Default::default() },
                ..Default::default()
            },
            ..Default::default()
        }
    )]
    #[case(
        ParameterError::BandwidthInvalid(0.),
        SimulatorOption {
            imaging: ImagingOption {
                psf: PsfOption { fractional_bandwidth: 0., ..Default::default() },
                ..Default::default()
            },
            ..Default::default()
        }
    )]
    fn invalid_option(#[case] expect: ParameterError, #[case] option: SimulatorOption) {
        assert_eq!(
            Some(SimulatorError::Parameter(expect)),
            Simulator::new(option).err()
        );
    }

    #[rstest::rstest]
    fn psf_and_profiles(sim: Simulator) -> anyhow::Result<()> {
        let psf = sim.get_psf(ImagingMode::Harmonic, 3.5 * MHz, 0.35)?;
        assert_eq!(41, psf.size());
        let profiles = sim.get_profiles(3.5 * MHz, 0.35)?;
        approx::assert_abs_diff_eq!(
            sim.grid().depth(),
            profiles.depth()[profiles.depth().len() - 1],
            epsilon = 1e-12
        );
        assert!(sim.get_psf(ImagingMode::Harmonic, 3.5 * MHz, 1.5).is_err());
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_option() -> anyhow::Result<()> {
        let option: SimulatorOption = serde_json::from_str(
            r#"{
                "grid": { "size": 128, "width": 0.04, "depth": 0.06 },
                "medium": { "attenuation": 0.5, "habitus": "Obese" }
            }"#,
        )?;
        assert_eq!(128, option.grid.size);
        assert_eq!(Habitus::Obese, option.medium.habitus);
        assert_eq!(PhantomOption::default(), option.phantom);
        assert_eq!(ImagingOption::default(), option.imaging);
        Ok(())
    }
}
