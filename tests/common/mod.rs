//! Synthetic BDF files for the integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const TOP: &str = "MIME_boundary-1";
pub const INNER: &str = "MIME_boundary-2";
pub const START_TIME: i64 = 4_836_880_001_000_000_000;

struct Integration {
    attachments: Vec<(&'static str, Vec<u8>)>,
    aborted: bool,
    truncate_header: bool,
}

/// Builder for a BDF stream
pub struct BdfBuilder {
    mode: &'static str,
    processor: &'static str,
    correlator_type: Option<&'static str>,
    big_endian: bool,
    num_time: Option<u32>,
    cross_type: &'static str,
    typed_cross_data: bool,
    sizes: Vec<(&'static str, u64)>,
    integrations: Vec<Integration>,
    closed: bool,
}

impl BdfBuilder {
    pub fn new(mode: &'static str, processor: &'static str) -> Self {
        Self {
            mode,
            processor,
            correlator_type: None,
            big_endian: false,
            num_time: None,
            cross_type: "INT16_TYPE",
            typed_cross_data: true,
            sizes: Vec::new(),
            integrations: Vec::new(),
            closed: true,
        }
    }

    /// CROSS_ONLY correlator data, 12 int16 cross values per integration
    pub fn cross_only(integrations: usize) -> Self {
        let mut builder = Self::new("CROSS_ONLY", "CORRELATOR").declare("crossData", 12);
        for _ in 0..integrations {
            builder = builder.integration(&["crossData"]);
        }
        builder
    }

    pub fn declare(mut self, name: &'static str, size: u64) -> Self {
        self.sizes.push((name, size));
        self
    }

    pub fn correlator_type(mut self, correlator_type: &'static str) -> Self {
        self.correlator_type = Some(correlator_type);
        self
    }

    pub fn cross_type(mut self, cross_type: &'static str) -> Self {
        self.cross_type = cross_type;
        self
    }

    /// Leave the `type` attribute off `<crossData>` in subset headers
    pub fn without_cross_type(mut self) -> Self {
        self.typed_cross_data = false;
        self
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    /// Declare the integration count (dimensionality 0)
    pub fn num_time(mut self, n: u32) -> Self {
        self.num_time = Some(n);
        self
    }

    /// Add an integration carrying the named attachments, each filled to
    /// its declared size (or 4 elements when undeclared)
    pub fn integration(mut self, names: &[&'static str]) -> Self {
        let index = self.integrations.len();
        let attachments = names
            .iter()
            .map(|name| (*name, self.payload(name, index)))
            .collect();
        self.integrations.push(Integration {
            attachments,
            aborted: false,
            truncate_header: false,
        });
        self
    }

    /// Add an integration with explicit payloads
    pub fn integration_with(mut self, attachments: Vec<(&'static str, Vec<u8>)>) -> Self {
        self.integrations.push(Integration {
            attachments,
            aborted: false,
            truncate_header: false,
        });
        self
    }

    /// Add a cancelling integration without attachments
    pub fn aborted_integration(mut self) -> Self {
        self.integrations.push(Integration {
            attachments: Vec::new(),
            aborted: true,
            truncate_header: false,
        });
        self
    }

    /// Add an integration whose XML header never reaches its boundary
    pub fn truncated_integration(mut self) -> Self {
        self.integrations.push(Integration {
            attachments: Vec::new(),
            aborted: false,
            truncate_header: true,
        });
        self
    }

    pub fn without_closing_boundary(mut self) -> Self {
        self.closed = false;
        self
    }

    pub fn width(&self, name: &str) -> usize {
        match name {
            "actualDurations" | "actualTimes" => 8,
            "crossData" if self.cross_type.to_ascii_uppercase().starts_with("INT16") => 2,
            _ => 4,
        }
    }

    /// Values are `100 * integration + k`, encoded with the element type of
    /// the attachment
    pub fn payload(&self, name: &str, integration: usize) -> Vec<u8> {
        let count = self
            .sizes
            .iter()
            .find(|(n, _)| *n == name)
            .map_or(4, |(_, size)| *size as usize);
        let cross_float = self.cross_type.to_ascii_uppercase().starts_with("FLOAT32");
        let mut out = Vec::new();
        for k in 0..count {
            let v = (100 * integration + k) as i64;
            let bytes: Vec<u8> = match (name, self.width(name)) {
                (_, 8) => self.encode(&v.to_le_bytes(), &v.to_be_bytes()),
                (_, 2) => self.encode(&(v as i16).to_le_bytes(), &(v as i16).to_be_bytes()),
                ("flags", _) => self.encode(&(v as u32).to_le_bytes(), &(v as u32).to_be_bytes()),
                ("crossData", _) if !cross_float => {
                    self.encode(&(v as i32).to_le_bytes(), &(v as i32).to_be_bytes())
                }
                _ => self.encode(&(v as f32).to_le_bytes(), &(v as f32).to_be_bytes()),
            };
            out.extend(bytes);
        }
        out
    }

    fn encode(&self, le: &[u8], be: &[u8]) -> Vec<u8> {
        if self.big_endian {
            be.to_vec()
        } else {
            le.to_vec()
        }
    }

    fn is_correlator(&self) -> bool {
        self.processor == "CORRELATOR"
    }

    fn global_header(&self) -> String {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!(
            "<sdmDataHeader xmlns:xlink=\"http://www.w3.org/1999/xlink\" byteOrder=\"{}\" schemaVersion=\"2\" projectPath=\"3/1/4/\">\n",
            if self.big_endian { "Big_Endian" } else { "Little_Endian" }
        ));
        xml.push_str(&format!("<startTime>{}</startTime>\n", START_TIME));
        xml.push_str("<dataOID xlink:type=\"locator\" xlink:href=\"uid://X1/X2/X3\" xlink:title=\"Synthetic BDF\"/>\n");
        match self.num_time {
            Some(n) => {
                xml.push_str("<dimensionality axes=\"TIM\">0</dimensionality>\n");
                xml.push_str(&format!("<numTime>{}</numTime>\n", n));
            }
            None => xml.push_str("<dimensionality axes=\"TIM\">1</dimensionality>\n"),
        }
        xml.push_str("<execBlock xlink:href=\"uid://X1/X2/X0\"/>\n");
        xml.push_str("<numAntenna>2</numAntenna>\n");
        xml.push_str(&format!("<correlationMode>{}</correlationMode>\n", self.mode));
        xml.push_str("<spectralResolution>FULL_RESOLUTION</spectralResolution>\n");
        xml.push_str(&format!("<processorType>{}</processorType>\n", self.processor));
        xml.push_str("<dataStruct apc=\"AP_UNCORRECTED\">\n");
        xml.push_str("<baseband name=\"BB_1\">\n");
        xml.push_str("<spectralWindow sw=\"1\" swbb=\"BB_1_SW_1\" crossPolProducts=\"XX YY\" sdPolProducts=\"XX YY\" scaleFactor=\"1.0\" numSpectralPoint=\"3\" numBin=\"1\" sideband=\"LSB\"/>\n");
        xml.push_str("</baseband>\n");
        for (name, size) in &self.sizes {
            let extra = match (*name, self.correlator_type) {
                ("zeroLags", Some(t)) => format!(" correlatorType=\"{}\"", t),
                ("autoData", _) => " normalized=\"false\"".to_string(),
                _ => String::new(),
            };
            xml.push_str(&format!(
                "<{} size=\"{}\" axes=\"BAL BAB SPW SPP POL\"{}/>\n",
                name, size, extra
            ));
        }
        xml.push_str("</dataStruct>\n");
        xml.push_str("</sdmDataHeader>");
        xml
    }

    fn subset_header(&self, index: usize, integration: &Integration) -> String {
        let path = if self.is_correlator() {
            format!("3/1/4/{}/", index + 1)
        } else {
            "3/1/4/".to_string()
        };
        let time = START_TIME + 1_000_000_000 * (index as i64 + 1);

        let mut xml = format!(
            "<sdmDataSubsetHeader xmlns:xlink=\"http://www.w3.org/1999/xlink\" projectPath=\"{}\">\n",
            path
        );
        xml.push_str(&format!(
            "<schedulePeriodTime>\n<time>{}</time>\n<interval>1000000000</interval>\n</schedulePeriodTime>\n",
            time
        ));
        xml.push_str("<dataStruct ref=\"sdmDataHeader\"/>\n");

        if integration.aborted {
            xml.push_str(&format!(
                "<abortObservation>\n<stopTime>{}</stopTime>\n<abortReason>Operator abort</abortReason>\n</abortObservation>\n",
                time
            ));
        } else {
            let mut names: Vec<&str> = integration.attachments.iter().map(|(n, _)| *n).collect();
            if self.mode != "AUTO_ONLY" && !names.contains(&"crossData") {
                names.push("crossData");
            }
            if self.mode != "CROSS_ONLY" && !names.contains(&"autoData") {
                names.push("autoData");
            }
            for name in names {
                let href = format!("uid://X1/X2/X3/{}/{}.bin", index + 1, name);
                if name == "crossData" && self.is_correlator() && self.typed_cross_data {
                    xml.push_str(&format!(
                        "<crossData xlink:href=\"{}\" type=\"{}\"/>\n",
                        href, self.cross_type
                    ));
                } else {
                    xml.push_str(&format!("<{} xlink:href=\"{}\"/>\n", name, href));
                }
            }
        }
        xml.push_str("</sdmDataSubsetHeader>");
        xml
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        let text = |out: &mut Vec<u8>, s: &str| {
            out.extend_from_slice(s.as_bytes());
            out.push(b'\n');
        };

        text(&mut out, "MIME-Version: 1.0");
        text(
            &mut out,
            &format!(
                "Content-Type: multipart/mixed; boundary=\"{}\"; type=\"text/xml\"",
                TOP
            ),
        );
        text(&mut out, "Content-Description: Correlator");
        text(&mut out, "Content-Location: uid://X1/X2/X3/");
        text(&mut out, "");
        text(&mut out, &format!("--{}", TOP));
        text(&mut out, "Content-Type: text/xml; charset=\"UTF-8\"");
        text(&mut out, "Content-Location: sdmDataHeader.xml");
        text(&mut out, "");
        text(&mut out, &self.global_header());

        for (index, integration) in self.integrations.iter().enumerate() {
            text(&mut out, &format!("--{}", TOP));
            text(
                &mut out,
                &format!(
                    "Content-Type: Multipart/Related; boundary=\"{}\"; type=\"text/xml\"; start=\"<{}/desc.xml>\"",
                    INNER,
                    index + 1
                ),
            );
            text(&mut out, "Content-Description: Data and metadata subset");
            text(&mut out, &format!("--{}", INNER));
            text(&mut out, "Content-Type: text/xml; charset=\"UTF-8\"");
            text(
                &mut out,
                &format!("Content-Location: uid://X1/X2/X3/{}/desc.xml", index + 1),
            );
            text(&mut out, "");
            text(&mut out, &self.subset_header(index, integration));
            if integration.truncate_header {
                for _ in 0..200 {
                    text(&mut out, "<!-- padding -->");
                }
                return out;
            }

            for (name, payload) in &integration.attachments {
                text(&mut out, &format!("--{}", INNER));
                text(&mut out, "Content-Type: binary/octet-stream");
                text(
                    &mut out,
                    &format!("Content-Location: uid://X1/X2/X3/{}/{}.bin", index + 1, name),
                );
                text(&mut out, "");
                out.extend_from_slice(payload);
                out.push(b'\n');
            }
            text(&mut out, &format!("--{}--", INNER));
        }

        if self.closed {
            text(&mut out, &format!("--{}--", TOP));
        }
        out
    }

    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}
