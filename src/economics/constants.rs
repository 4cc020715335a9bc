use serde::{Deserialize, Serialize};

use super::engine::EconomicsError;

/// 지역별 기본 상수 프리셋.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionPreset {
    /// 스페인(유로) 기준 근사값.
    Spain,
    /// 사용자가 직접 수정한 값.
    Custom,
}

/// 태양광 경제성 계산에 쓰이는 고정 상수 테이블.
///
/// 계산 엔진은 이 구조체만 참조하며 내부에 상수 리터럴을 두지 않는다.
/// config.toml의 `[constants]` 테이블로 지역 재보정이 가능하다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarConstants {
    /// 전력 단가 [통화/kWh]
    pub electricity_unit_price: f64,
    /// 패널 1장 정격 출력 [W]
    pub panel_rated_wattage: f64,
    /// 설치 단가 [통화/kWp]
    pub installed_cost_per_kw: f64,
    /// 발전량당 CO₂ 감축량 [kg/kWh]
    pub co2_per_kwh: f64,
    /// CO₂ 1톤당 나무 환산 그루 수
    pub trees_per_ton_co2: f64,
    /// 대출 명목 연이율(소수, 0.065 = 6.5%)
    pub annual_financing_rate: f64,
    /// 대출 기간 [년]
    pub financing_term_years: u32,
    /// 음영/인버터/방위 손실을 반영한 출력 보정계수(0 < f ≤ 1)
    pub system_derating_factor: f64,
    /// ROI 평가 기간 [년]
    pub evaluation_horizon_years: u32,
    /// 표시용 통화 기호
    pub currency_symbol: String,
}

impl SolarConstants {
    /// 스페인 기준 근사 상수.
    pub fn spain() -> Self {
        Self {
            electricity_unit_price: 0.20,
            panel_rated_wattage: 450.0,
            installed_cost_per_kw: 1100.0,
            co2_per_kwh: 0.3,
            trees_per_ton_co2: 45.0,
            annual_financing_rate: 0.065,
            financing_term_years: 10,
            system_derating_factor: 0.75,
            evaluation_horizon_years: 25,
            currency_symbol: "€".to_string(),
        }
    }

    /// 프리셋에 해당하는 상수를 반환한다. Custom은 None.
    pub fn for_preset(preset: RegionPreset) -> Option<Self> {
        match preset {
            RegionPreset::Spain => Some(Self::spain()),
            RegionPreset::Custom => None,
        }
    }

    /// 현재 값이 어떤 프리셋과 같은지 판별한다.
    pub fn preset(&self) -> RegionPreset {
        if *self == Self::spain() {
            RegionPreset::Spain
        } else {
            RegionPreset::Custom
        }
    }

    /// 상수 테이블의 유효성을 검사한다. 실패 시 문제된 필드명을 담아 반환한다.
    pub fn validate(&self) -> Result<(), EconomicsError> {
        positive("electricity_unit_price", self.electricity_unit_price)?;
        positive("panel_rated_wattage", self.panel_rated_wattage)?;
        positive("installed_cost_per_kw", self.installed_cost_per_kw)?;
        non_negative("co2_per_kwh", self.co2_per_kwh)?;
        non_negative("trees_per_ton_co2", self.trees_per_ton_co2)?;
        non_negative("annual_financing_rate", self.annual_financing_rate)?;
        positive("system_derating_factor", self.system_derating_factor)?;
        if self.system_derating_factor > 1.0 {
            return Err(EconomicsError::InvalidConstant {
                field: "system_derating_factor",
                reason: "must not exceed 1",
            });
        }
        if self.financing_term_years == 0 {
            return Err(EconomicsError::InvalidConstant {
                field: "financing_term_years",
                reason: "must be at least 1 year",
            });
        }
        if self.evaluation_horizon_years == 0 {
            return Err(EconomicsError::InvalidConstant {
                field: "evaluation_horizon_years",
                reason: "must be at least 1 year",
            });
        }
        Ok(())
    }
}

impl Default for SolarConstants {
    fn default() -> Self {
        Self::spain()
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), EconomicsError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EconomicsError::InvalidConstant {
            field,
            reason: "must be finite and greater than 0",
        });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<(), EconomicsError> {
    if !value.is_finite() || value < 0.0 {
        return Err(EconomicsError::InvalidConstant {
            field,
            reason: "must be finite and not negative",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spain_preset_is_valid() {
        assert!(SolarConstants::spain().validate().is_ok());
        assert_eq!(SolarConstants::default().preset(), RegionPreset::Spain);
    }

    #[test]
    fn derating_above_one_is_rejected() {
        let c = SolarConstants {
            system_derating_factor: 1.2,
            ..SolarConstants::spain()
        };
        match c.validate() {
            Err(EconomicsError::InvalidConstant { field, .. }) => {
                assert_eq!(field, "system_derating_factor")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn zero_rate_is_allowed_but_zero_price_is_not() {
        let zero_rate = SolarConstants {
            annual_financing_rate: 0.0,
            ..SolarConstants::spain()
        };
        assert!(zero_rate.validate().is_ok());
        assert_eq!(zero_rate.preset(), RegionPreset::Custom);

        let zero_price = SolarConstants {
            electricity_unit_price: 0.0,
            ..SolarConstants::spain()
        };
        assert!(zero_price.validate().is_err());
    }

    #[test]
    fn partial_toml_table_falls_back_to_preset() {
        let c: SolarConstants = toml::from_str("electricity_unit_price = 0.25").unwrap();
        assert_eq!(c.electricity_unit_price, 0.25);
        assert_eq!(c.panel_rated_wattage, 450.0);
        assert_eq!(c.financing_term_years, 10);
    }
}
