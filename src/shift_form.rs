//! Shift submission form.
//!
//! Operators fill in the readings of their shift for both pickling sections.
//! Values are kept as typed until submission, when they are validated and
//! parsed into a `ShiftReport`.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::error::ShiftFormError;
use crate::fields::*;

/// Text inputs of the form, in the order they are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Date,
    SteelType,
    HfConcentration,
    Hno3Concentration,
    Tm1Consumption,
    Tm2Consumption,
    Tm1Volume,
    Tm2Volume,
    HfAddition,
    Hno3Addition,
    ChemSampleHno3,
    ChemSampleHf,
    ChemSampleIron,
    ChemObservations,
    ElectrolyteAddition,
    CarbonateAddition,
    SulfuricAcidAddition,
    ElectroSampleConductivity,
    ElectroSamplePh,
    ElectroSampleIron,
    ElectroObservations,
}

impl FormField {
    pub const ALL: [FormField; 21] = [
        FormField::Date,
        FormField::SteelType,
        FormField::HfConcentration,
        FormField::Hno3Concentration,
        FormField::Tm1Consumption,
        FormField::Tm2Consumption,
        FormField::Tm1Volume,
        FormField::Tm2Volume,
        FormField::HfAddition,
        FormField::Hno3Addition,
        FormField::ChemSampleHno3,
        FormField::ChemSampleHf,
        FormField::ChemSampleIron,
        FormField::ChemObservations,
        FormField::ElectrolyteAddition,
        FormField::CarbonateAddition,
        FormField::SulfuricAcidAddition,
        FormField::ElectroSampleConductivity,
        FormField::ElectroSamplePh,
        FormField::ElectroSampleIron,
        FormField::ElectroObservations,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Date => "Data",
            FormField::SteelType => "Tipo de Aço",
            FormField::HfConcentration => "Concentração HF (g/L)",
            FormField::Hno3Concentration => "Concentração HNO3 (g/L)",
            FormField::Tm1Consumption => "Consumo TM1 (L)",
            FormField::Tm2Consumption => "Consumo TM2 (L)",
            FormField::Tm1Volume => "Volume TM1 (L)",
            FormField::Tm2Volume => "Volume TM2 (L)",
            FormField::HfAddition => "Adição HF (L)",
            FormField::Hno3Addition => "Adição HNO3 (L)",
            FormField::ChemSampleHno3 => "Amostra HNO3 (g/L)",
            FormField::ChemSampleHf => "Amostra HF (g/L)",
            FormField::ChemSampleIron => "Amostra Ferro (g/L)",
            FormField::ChemObservations => "Observações (química)",
            FormField::ElectrolyteAddition => "Adição Eletrólito (kg)",
            FormField::CarbonateAddition => "Adição Carbonato (kg)",
            FormField::SulfuricAcidAddition => "Adição Ácido Sulfúrico (L)",
            FormField::ElectroSampleConductivity => "Amostra Condutividade (mS/cm)",
            FormField::ElectroSamplePh => "Amostra pH",
            FormField::ElectroSampleIron => "Amostra Ferro eletrolítico (g/L)",
            FormField::ElectroObservations => "Observações (eletrolítica)",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(
            self,
            FormField::Date
                | FormField::SteelType
                | FormField::HfConcentration
                | FormField::Hno3Concentration
                | FormField::Tm1Consumption
                | FormField::Tm2Consumption
                | FormField::Tm1Volume
                | FormField::Tm2Volume
        )
    }

    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            FormField::Date
                | FormField::SteelType
                | FormField::ChemObservations
                | FormField::ElectroObservations
        )
    }
}

/// Form values as typed.
#[derive(Debug, Clone)]
pub struct ShiftForm {
    pub date: String,
    pub shift: Shift,
    pub steel_type: String,
    pub hf_concentration: String,
    pub hno3_concentration: String,
    pub tm1_consumption: String,
    pub tm2_consumption: String,
    pub tm1_volume: String,
    pub tm2_volume: String,
    pub brushes: [BrushCondition; 4],
    pub hf_addition: String,
    pub hno3_addition: String,
    pub chem_sample_hno3: String,
    pub chem_sample_hf: String,
    pub chem_sample_iron: String,
    pub chem_observations: String,
    pub electrolyte_addition: String,
    pub carbonate_addition: String,
    pub sulfuric_acid_addition: String,
    pub electro_sample_conductivity: String,
    pub electro_sample_ph: String,
    pub electro_sample_iron: String,
    pub electro_observations: String,
    pub submitting: bool,
}

impl Default for ShiftForm {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

impl ShiftForm {
    /// Empty form dated `today`, morning shift, all brushes good.
    pub fn new(today: NaiveDate) -> Self {
        ShiftForm {
            date: today.format("%Y-%m-%d").to_string(),
            shift: Shift::Morning,
            steel_type: String::new(),
            hf_concentration: String::new(),
            hno3_concentration: String::new(),
            tm1_consumption: String::new(),
            tm2_consumption: String::new(),
            tm1_volume: String::new(),
            tm2_volume: String::new(),
            brushes: [BrushCondition::Good; 4],
            hf_addition: String::new(),
            hno3_addition: String::new(),
            chem_sample_hno3: String::new(),
            chem_sample_hf: String::new(),
            chem_sample_iron: String::new(),
            chem_observations: String::new(),
            electrolyte_addition: String::new(),
            carbonate_addition: String::new(),
            sulfuric_acid_addition: String::new(),
            electro_sample_conductivity: String::new(),
            electro_sample_ph: String::new(),
            electro_sample_iron: String::new(),
            electro_observations: String::new(),
            submitting: false,
        }
    }

    pub fn text(&self, field: FormField) -> &str {
        match field {
            FormField::Date => &self.date,
            FormField::SteelType => &self.steel_type,
            FormField::HfConcentration => &self.hf_concentration,
            FormField::Hno3Concentration => &self.hno3_concentration,
            FormField::Tm1Consumption => &self.tm1_consumption,
            FormField::Tm2Consumption => &self.tm2_consumption,
            FormField::Tm1Volume => &self.tm1_volume,
            FormField::Tm2Volume => &self.tm2_volume,
            FormField::HfAddition => &self.hf_addition,
            FormField::Hno3Addition => &self.hno3_addition,
            FormField::ChemSampleHno3 => &self.chem_sample_hno3,
            FormField::ChemSampleHf => &self.chem_sample_hf,
            FormField::ChemSampleIron => &self.chem_sample_iron,
            FormField::ChemObservations => &self.chem_observations,
            FormField::ElectrolyteAddition => &self.electrolyte_addition,
            FormField::CarbonateAddition => &self.carbonate_addition,
            FormField::SulfuricAcidAddition => &self.sulfuric_acid_addition,
            FormField::ElectroSampleConductivity => &self.electro_sample_conductivity,
            FormField::ElectroSamplePh => &self.electro_sample_ph,
            FormField::ElectroSampleIron => &self.electro_sample_iron,
            FormField::ElectroObservations => &self.electro_observations,
        }
    }

    pub fn text_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Date => &mut self.date,
            FormField::SteelType => &mut self.steel_type,
            FormField::HfConcentration => &mut self.hf_concentration,
            FormField::Hno3Concentration => &mut self.hno3_concentration,
            FormField::Tm1Consumption => &mut self.tm1_consumption,
            FormField::Tm2Consumption => &mut self.tm2_consumption,
            FormField::Tm1Volume => &mut self.tm1_volume,
            FormField::Tm2Volume => &mut self.tm2_volume,
            FormField::HfAddition => &mut self.hf_addition,
            FormField::Hno3Addition => &mut self.hno3_addition,
            FormField::ChemSampleHno3 => &mut self.chem_sample_hno3,
            FormField::ChemSampleHf => &mut self.chem_sample_hf,
            FormField::ChemSampleIron => &mut self.chem_sample_iron,
            FormField::ChemObservations => &mut self.chem_observations,
            FormField::ElectrolyteAddition => &mut self.electrolyte_addition,
            FormField::CarbonateAddition => &mut self.carbonate_addition,
            FormField::SulfuricAcidAddition => &mut self.sulfuric_acid_addition,
            FormField::ElectroSampleConductivity => &mut self.electro_sample_conductivity,
            FormField::ElectroSamplePh => &mut self.electro_sample_ph,
            FormField::ElectroSampleIron => &mut self.electro_sample_iron,
            FormField::ElectroObservations => &mut self.electro_observations,
        }
    }

    /// Check required fields and numbers, producing the report to submit.
    pub fn validate(&self, operator: &str, email: &str) -> Result<ShiftReport, ShiftFormError> {
        let missing: Vec<&'static str> = FormField::ALL
            .iter()
            .filter(|f| f.is_required() && self.text(**f).trim().is_empty())
            .map(|f| f.label())
            .collect();
        if !missing.is_empty() {
            return Err(ShiftFormError::Missing(missing));
        }
        for field in FormField::ALL.iter().filter(|f| f.is_numeric()) {
            parse_optional(*field, self.text(*field))?;
        }
        if NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").is_err() {
            return Err(ShiftFormError::InvalidDate(self.date.clone()));
        }

        let num = |f: FormField| parse_optional(f, self.text(f)).ok().flatten();
        let req = |f: FormField| num(f).unwrap_or_default();
        Ok(ShiftReport {
            operator: operator.to_string(),
            email: email.to_string(),
            date: self.date.trim().to_string(),
            shift: self.shift,
            steel_type: self.steel_type.trim().to_string(),
            chemical: ChemicalPickling {
                hf_concentration: req(FormField::HfConcentration),
                hno3_concentration: req(FormField::Hno3Concentration),
                tm1_consumption: req(FormField::Tm1Consumption),
                tm2_consumption: req(FormField::Tm2Consumption),
                tm1_volume: req(FormField::Tm1Volume),
                tm2_volume: req(FormField::Tm2Volume),
                brushes: self.brushes,
                hf_addition: num(FormField::HfAddition),
                hno3_addition: num(FormField::Hno3Addition),
                sample_hno3: num(FormField::ChemSampleHno3),
                sample_hf: num(FormField::ChemSampleHf),
                sample_iron: num(FormField::ChemSampleIron),
                observations: self.chem_observations.clone(),
            },
            electrolytic: ElectrolyticPickling {
                electrolyte_addition: num(FormField::ElectrolyteAddition),
                carbonate_addition: num(FormField::CarbonateAddition),
                sulfuric_acid_addition: num(FormField::SulfuricAcidAddition),
                sample_conductivity: num(FormField::ElectroSampleConductivity),
                sample_ph: num(FormField::ElectroSamplePh),
                sample_iron: num(FormField::ElectroSampleIron),
                observations: self.electro_observations.clone(),
            },
        })
    }

    /// Clear the readings after a submission. Date and shift are kept.
    pub fn reset_after_submit(&mut self) {
        let date = std::mem::take(&mut self.date);
        let shift = self.shift;
        *self = ShiftForm { date, shift, ..ShiftForm::new(Local::now().date_naive()) };
    }
}

fn parse_optional(field: FormField, raw: &str) -> Result<Option<f64>, ShiftFormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| ShiftFormError::NotANumber { field: field.label(), value: raw.to_string() })
}

/// A validated shift submission.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShiftReport {
    pub operator: String,
    pub email: String,
    pub date: String,
    pub shift: Shift,
    pub steel_type: String,
    pub chemical: ChemicalPickling,
    pub electrolytic: ElectrolyticPickling,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChemicalPickling {
    pub hf_concentration: f64,
    pub hno3_concentration: f64,
    pub tm1_consumption: f64,
    pub tm2_consumption: f64,
    pub tm1_volume: f64,
    pub tm2_volume: f64,
    pub brushes: [BrushCondition; 4],
    pub hf_addition: Option<f64>,
    pub hno3_addition: Option<f64>,
    pub sample_hno3: Option<f64>,
    pub sample_hf: Option<f64>,
    pub sample_iron: Option<f64>,
    pub observations: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ElectrolyticPickling {
    pub electrolyte_addition: Option<f64>,
    pub carbonate_addition: Option<f64>,
    pub sulfuric_acid_addition: Option<f64>,
    pub sample_conductivity: Option<f64>,
    pub sample_ph: Option<f64>,
    pub sample_iron: Option<f64>,
    pub observations: String,
}
