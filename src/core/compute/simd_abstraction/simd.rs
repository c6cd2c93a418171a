//! Runtime SIMD capability detection.
//!
//! Detects the widest engine the CPU supports, honours environment overrides
//! for testing, and exposes the per-capability lane counts the search
//! dispatcher needs to size its windows.

use std::fmt;
use std::str::FromStr;

/// Instruction-set tiers the kernels can run on, ordered from narrowest to
/// widest so a configured maximum can cap detection with `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SimdCapability {
    /// Array engine, 16 x i8 / 8 x i16 lanes. Always available.
    Portable,
    /// SSE4.1, 16 x i8 / 8 x i16 lanes.
    Sse41,
    /// AVX2, 32 x i8 / 16 x i16 lanes.
    Avx2,
}

impl SimdCapability {
    /// Lanes per vector for 8-bit scores.
    pub fn lanes_8(self) -> usize {
        match self {
            SimdCapability::Avx2 => 32,
            SimdCapability::Sse41 | SimdCapability::Portable => 16,
        }
    }

    /// Lanes per vector for 16-bit scores.
    pub fn lanes_16(self) -> usize {
        self.lanes_8() / 2
    }

    /// Returns a human-readable description of the engine behind this tier
    pub fn description(self) -> &'static str {
        match self {
            SimdCapability::Portable => "portable (array lanes, 16-way i8 / 8-way i16)",
            SimdCapability::Sse41 => "SSE4.1 (128-bit, 16-way i8 / 8-way i16)",
            SimdCapability::Avx2 => "AVX2 (256-bit, 32-way i8 / 16-way i16)",
        }
    }
}

impl fmt::Display for SimdCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimdCapability::Portable => "portable",
            SimdCapability::Sse41 => "sse41",
            SimdCapability::Avx2 => "avx2",
        };
        f.write_str(name)
    }
}

impl FromStr for SimdCapability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "portable" | "scalar" => Ok(SimdCapability::Portable),
            "sse41" | "sse4.1" | "sse" => Ok(SimdCapability::Sse41),
            "avx2" => Ok(SimdCapability::Avx2),
            other => Err(format!("unknown SIMD capability '{other}' (expected portable, sse41 or avx2)")),
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).map(|v| v == "1").unwrap_or(false)
}

/// Detects the widest SIMD tier supported by the running CPU
///
/// Environment variable overrides for testing/debugging:
/// - `FERROUS_SSA_FORCE_PORTABLE=1`: use the array engine everywhere
/// - `FERROUS_SSA_FORCE_SSE=1`: skip AVX2 even when available (x86_64 only)
pub fn detect_simd_capability() -> SimdCapability {
    if env_flag("FERROUS_SSA_FORCE_PORTABLE") {
        log::info!("FERROUS_SSA_FORCE_PORTABLE=1: Using portable engine");
        return SimdCapability::Portable;
    }

    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("sse4.1") {
            if env_flag("FERROUS_SSA_FORCE_SSE") {
                log::info!("FERROUS_SSA_FORCE_SSE=1: Using SSE4.1 (128-bit) engine");
                return SimdCapability::Sse41;
            }
            return SimdCapability::Avx2;
        }
        if is_x86_feature_detected!("sse4.1") {
            return SimdCapability::Sse41;
        }
        SimdCapability::Portable
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        SimdCapability::Portable
    }
}

/// Detected capability capped by a configured maximum.
pub fn effective_capability(max: SimdCapability) -> SimdCapability {
    detect_simd_capability().min(max)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simd_capability_detection() {
        let cap = detect_simd_capability();
        println!("Detected SIMD capability: {cap} ({})", cap.description());

        #[cfg(target_arch = "x86_64")]
        {
            if std::env::var_os("FERROUS_SSA_FORCE_PORTABLE").is_none()
                && std::env::var_os("FERROUS_SSA_FORCE_SSE").is_none()
            {
                if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("sse4.1") {
                    assert_eq!(cap, SimdCapability::Avx2);
                } else if is_x86_feature_detected!("sse4.1") {
                    assert_eq!(cap, SimdCapability::Sse41);
                }
            }
        }

        #[cfg(not(target_arch = "x86_64"))]
        {
            assert_eq!(cap, SimdCapability::Portable);
        }
    }

    #[test]
    fn test_capability_ordering_caps_detection() {
        assert!(SimdCapability::Portable < SimdCapability::Sse41);
        assert!(SimdCapability::Sse41 < SimdCapability::Avx2);
        assert_eq!(effective_capability(SimdCapability::Portable), SimdCapability::Portable);
        assert!(effective_capability(SimdCapability::Sse41) <= SimdCapability::Sse41);
    }

    #[test]
    fn test_lane_counts() {
        assert_eq!(SimdCapability::Portable.lanes_8(), 16);
        assert_eq!(SimdCapability::Sse41.lanes_16(), 8);
        assert_eq!(SimdCapability::Avx2.lanes_8(), 32);
        assert_eq!(SimdCapability::Avx2.lanes_16(), 16);
    }

    #[test]
    fn test_capability_parse_and_display() {
        for cap in [SimdCapability::Portable, SimdCapability::Sse41, SimdCapability::Avx2] {
            assert_eq!(cap.to_string().parse::<SimdCapability>(), Ok(cap));
        }
        assert!("neon".parse::<SimdCapability>().is_err());
    }
}
