// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{ParameterKind, ParameterSet, ParameterSpec};
use crate::engine::Event;
use crate::errors::ProcessorError;
use crate::io::OutputEntry;
use crate::observability::messages::processor::HistogramMissing;
use crate::observability::messages::StructuredLog;
use crate::traits::{Flow, OutputSink, Processor};
use crate::utils::{profile_y, GaussFitOptions, Histogram2D};

use super::common::{debug_parameter, invalid, Tracer};

struct Target {
    name: String,
    total: Option<Histogram2D>,
}

/// Profiles `<selection>_<projection>` 2D histograms along x.
///
/// Each record's histogram is rebinned and profiled, and the `_mu` and
/// `_sigma` results are attached to the record for later processors. The
/// rebinned histograms are also summed over the job; at finalize the sums
/// are profiled again and written with their `_mu` and `_sigma` histograms.
pub struct ProfileFitProcessor {
    name: String,
    targets: Vec<Target>,
    rebin: usize,
    options: GaussFitOptions,
    tracer: Tracer,
}

impl ProfileFitProcessor {
    pub const TYPE_TAG: &'static str = "ProfileFitProcessor";

    pub fn schema() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required("selections", ParameterKind::StringList, "Selection name prefixes"),
            ParameterSpec::required("projections", ParameterKind::StringList, "Projection name suffixes"),
            ParameterSpec::optional("rebin", ParameterKind::Int, 1, "X bins merged before fitting"),
            ParameterSpec::optional("window", ParameterKind::Float, 2.0, "Fit window in sigma"),
            ParameterSpec::optional("max_iterations", ParameterKind::Int, 10, "Iteration limit per slice"),
            ParameterSpec::optional("min_entries", ParameterKind::Float, 10.0, "Minimum slice content to fit"),
            debug_parameter(),
        ]
    }

    pub fn create(name: &str, params: &ParameterSet) -> Result<Box<dyn Processor>, ProcessorError> {
        let selections = params.get_string_list("selections")?;
        let projections = params.get_string_list("projections")?;
        if selections.is_empty() || projections.is_empty() {
            return Err(invalid("selections", "needs at least one selection and one projection"));
        }

        let rebin = params.get_int("rebin")?;
        let rebin = usize::try_from(rebin)
            .ok()
            .filter(|r| *r > 0)
            .ok_or_else(|| invalid("rebin", format!("must be at least 1, got {}", rebin)))?;
        let window = params.get_float("window")?;
        if !(window.is_finite() && window > 0.0) {
            return Err(invalid("window", format!("must be positive, got {}", window)));
        }
        let min_entries = params.get_float("min_entries")?;
        if !(min_entries.is_finite() && min_entries >= 0.0) {
            return Err(invalid("min_entries", format!("must not be negative, got {}", min_entries)));
        }
        let max_iterations = params.get_int("max_iterations")?;
        let max_iterations = usize::try_from(max_iterations)
            .map_err(|_| invalid("max_iterations", format!("must not be negative, got {}", max_iterations)))?;

        let targets = selections
            .iter()
            .flat_map(|sel| projections.iter().map(move |proj| format!("{}_{}", sel, proj)))
            .map(|name| Target { name, total: None })
            .collect();

        Ok(Box::new(Self {
            name: name.to_string(),
            targets,
            rebin,
            options: GaussFitOptions {
                window,
                max_iterations,
                min_entries,
                ..GaussFitOptions::default()
            },
            tracer: Tracer::new(name, params)?,
        }))
    }
}

impl Processor for ProfileFitProcessor {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn process(&mut self, event: &mut Event, _sink: &mut dyn OutputSink) -> Result<Flow, ProcessorError> {
        for target in &mut self.targets {
            let rebinned = match event.histograms.get_2d(&target.name) {
                Some(histogram) => histogram.rebin_x(self.rebin)?,
                None => {
                    HistogramMissing {
                        processor: &self.name,
                        histogram: &target.name,
                    }
                    .log();
                    continue;
                }
            };

            let (mu, sigma) = profile_y(&rebinned, &self.options)?;
            self.tracer.trace(event.number(), || {
                format!("{}: fitted {} of {} slice(s)", target.name, mu.entries, mu.axis.bins)
            });
            event.histograms.insert_1d(mu);
            event.histograms.insert_1d(sigma);

            match &mut target.total {
                Some(total) => total.add(&rebinned)?,
                None => target.total = Some(rebinned),
            }
        }
        Ok(Flow::Continue)
    }

    fn finalize(&mut self, sink: &mut dyn OutputSink) -> Result<(), ProcessorError> {
        for total in self.targets.iter().filter_map(|t| t.total.as_ref()) {
            let (mu, sigma) = profile_y(total, &self.options)?;
            sink.write_entry(&OutputEntry::Histogram1d(mu))?;
            sink.write_entry(&OutputEntry::Histogram1d(sigma))?;
            sink.write_entry(&OutputEntry::Histogram2d(total.clone()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{bind_parameters, ParameterValue};
    use crate::io::MemorySink;
    use crate::utils::{Axis, HistogramSet};

    fn fitter(extra: &[(&str, ParameterValue)]) -> Result<Box<dyn Processor>, ProcessorError> {
        let mut supplied = ParameterSet::for_processor("fit");
        supplied.set("selections", vec!["vtxSel"]);
        supplied.set("projections", vec!["z_vs_mass"]);
        for (key, value) in extra {
            supplied.set(*key, value.clone());
        }
        let params = bind_parameters(&ProfileFitProcessor::schema(), &supplied).unwrap();
        ProfileFitProcessor::create("fit", &params)
    }

    /// A peak at y = 0.1 in the first x bin of `[0, 4)`.
    fn peaked() -> Histogram2D {
        let x = Axis::new(4, 0.0, 4.0).unwrap();
        let y = Axis::new(40, -4.0, 4.0).unwrap();
        let mut h = Histogram2D::new("vtxSel_z_vs_mass", "z vs mass", x, y);
        h.fill_weighted(0.5, 0.1, 20.0);
        h.fill_weighted(0.5, -0.1, 10.0);
        h.fill_weighted(0.5, 0.3, 10.0);
        h
    }

    fn event_with(histogram: Option<Histogram2D>) -> Event {
        let mut set = HistogramSet::new();
        if let Some(h) = histogram {
            set.insert_2d(h);
        }
        Event::with_histograms(0, "hists.jsonl", set)
    }

    #[test]
    fn test_profiles_and_attaches_results() {
        let mut p = fitter(&[("rebin", ParameterValue::Int(2))]).unwrap();
        let mut event = event_with(Some(peaked()));
        assert_eq!(p.process(&mut event, &mut MemorySink::new()).unwrap(), Flow::Continue);

        let mu = event.histograms.get_1d("vtxSel_z_vs_mass_mu").unwrap();
        assert_eq!(mu.axis.bins, 2);
        assert!((mu.bin_content(1) - 0.1).abs() < 1e-9);
        assert_eq!(mu.bin_content(2), 0.0);
        assert!(event.histograms.get_1d("vtxSel_z_vs_mass_sigma").is_some());
    }

    #[test]
    fn test_finalize_writes_summed_results() {
        let mut p = fitter(&[]).unwrap();
        for _ in 0..2 {
            p.process(&mut event_with(Some(peaked())), &mut MemorySink::new()).unwrap();
        }

        let mut sink = MemorySink::new();
        p.finalize(&mut sink).unwrap();
        match &sink.entries[..] {
            [OutputEntry::Histogram1d(mu), OutputEntry::Histogram1d(sigma), OutputEntry::Histogram2d(total)] => {
                assert_eq!(mu.name, "vtxSel_z_vs_mass_mu");
                assert_eq!(sigma.name, "vtxSel_z_vs_mass_sigma");
                assert_eq!(total.entries, 6);
                assert_eq!(total.bin_content(1, 21), 40.0);
            }
            other => panic!("unexpected entries {:?}", other),
        }
    }

    #[test]
    fn test_missing_histograms_are_skipped() {
        let mut p = fitter(&[]).unwrap();
        let mut event = event_with(None);
        assert_eq!(p.process(&mut event, &mut MemorySink::new()).unwrap(), Flow::Continue);
        assert!(event.histograms.is_empty());

        let mut sink = MemorySink::new();
        p.finalize(&mut sink).unwrap();
        assert!(sink.entries.is_empty());
    }

    #[test]
    fn test_rebin_must_divide_bins() {
        let mut p = fitter(&[("rebin", ParameterValue::Int(3))]).unwrap();
        let result = p.process(&mut event_with(Some(peaked())), &mut MemorySink::new());
        assert!(matches!(result, Err(ProcessorError::Histogram(_))));
        assert!(matches!(
            fitter(&[("rebin", ParameterValue::Int(0))]),
            Err(ProcessorError::InvalidParameter { ref key, .. }) if key == "rebin"
        ));
    }

    #[test]
    fn test_fit_settings_must_be_finite() {
        let cases = vec![
            ("window", f64::NAN),
            ("window", 0.0),
            ("window", f64::INFINITY),
            ("min_entries", f64::NAN),
            ("min_entries", -1.0),
        ];

        for (key, value) in cases {
            let result = fitter(&[(key, ParameterValue::Float(value))]);
            assert!(
                matches!(result, Err(ProcessorError::InvalidParameter { key: ref k, .. }) if k == key),
                "{} = {}",
                key,
                value
            );
        }
        assert!(fitter(&[("min_entries", ParameterValue::Float(0.0))]).is_ok());
    }
}
