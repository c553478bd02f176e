use super::*;
use crate::bdf::models::{
    AttachmentKind, ByteOrder, CorrelationMode, CorrelatorType, CrossDataType, ProcessorType,
    SpectralResolutionType,
};

const GLOBAL_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sdmDataHeader xmlns:xlink="http://www.w3.org/1999/xlink" byteOrder="Little_Endian" schemaVersion="2" projectPath="3/1/4/">
  <startTime>4836880001000000000</startTime>
  <dataOID xlink:type="locator" xlink:href="uid://X1/X2/X3" xlink:title="ALMA BDF test"/>
  <dimensionality axes="TIM">1</dimensionality>
  <execBlock xlink:href="uid://X1/X2/X0"/>
  <numAntenna>2</numAntenna>
  <correlationMode>CROSS_ONLY</correlationMode>
  <spectralResolution>FULL_RESOLUTION</spectralResolution>
  <processorType>CORRELATOR</processorType>
  <dataStruct apc="AP_UNCORRECTED">
    <baseband name="BB_1">
      <spectralWindow sw="1" swbb="BB_1_SW_1" image="2" crossPolProducts="XX YY" scaleFactor="1.0" numSpectralPoint="3" numBin="1" sideband="LSB"/>
      <spectralWindow sw="2" swbb="BB_1_SW_2" image="1" crossPolProducts="XX YY" scaleFactor="1.0" numSpectralPoint="3" numBin="1" sideband="USB"/>
    </baseband>
    <flags size="4" axes="BAL ANT"/>
    <actualTimes size="0" axes="BAL ANT"/>
    <crossData size="12" axes="BAL BAB SPW SPP POL"/>
    <zeroLags size="6" axes="BAL ANT BAB SPW" correlatorType="XF"/>
  </dataStruct>
</sdmDataHeader>
"#;

const TP_GLOBAL_HEADER: &str = r#"<sdmDataHeader byteOrder="Big_Endian" projectPath="7/2/1/">
  <startTime>100</startTime>
  <dimensionality>0</dimensionality>
  <numTime>5</numTime>
  <correlationMode>AUTO_ONLY</correlationMode>
  <processorType>RADIOMETER</processorType>
  <dataStruct>
    <baseband name="BB_1">
      <spectralWindow sw="1" sdPolProducts="XX YY" numSpectralPoint="1" numBin="1" sideband="NOSB"/>
    </baseband>
    <autoData size="20" axes="TIM ANT BAB SPW POL" normalized="false"/>
  </dataStruct>
</sdmDataHeader>
"#;

fn corr_subset(path: &str, body: &str) -> String {
    format!(
        r#"<sdmDataSubsetHeader xmlns:xlink="http://www.w3.org/1999/xlink" projectPath="{path}">
  <schedulePeriodTime>
    <time>4836880001500000000</time>
    <interval>1000000000</interval>
  </schedulePeriodTime>
  <dataStruct ref="sdmDataHeader"/>
  {body}
</sdmDataSubsetHeader>"#
    )
}

#[test]
fn test_decode_global_header() {
    let descriptor = decode_global_header(GLOBAL_HEADER).unwrap();

    assert_eq!(descriptor.byte_order, ByteOrder::LittleEndian);
    assert_eq!(descriptor.schema_version, Some(2));
    assert_eq!(descriptor.project_path.to_string(), "3/1/4/");
    assert_eq!(descriptor.start_time, 4_836_880_001_000_000_000);
    assert_eq!(descriptor.data_oid, "uid://X1/X2/X3");
    assert_eq!(descriptor.title, "ALMA BDF test");
    assert_eq!(descriptor.exec_block_uid, "uid://X1/X2/X0");
    assert_eq!(descriptor.num_antenna, 2);
    assert_eq!(descriptor.correlation_mode, CorrelationMode::CrossOnly);
    assert_eq!(
        descriptor.spectral_resolution,
        Some(SpectralResolutionType::FullResolution)
    );
    assert_eq!(descriptor.processor_type, ProcessorType::Correlator);
    assert_eq!(descriptor.correlator_type, Some(CorrelatorType::Xf));
    assert_eq!(descriptor.apc, vec!["AP_UNCORRECTED"]);
    assert!(descriptor.is_correlation());
    assert!(!descriptor.is_aborted());

    // dimensionality 1: no declared integration count
    assert_eq!(descriptor.declared_integration_count(), None);
}

#[test]
fn test_declared_sizes_from_data_struct() {
    let descriptor = decode_global_header(GLOBAL_HEADER).unwrap();

    assert_eq!(descriptor.declared_size(AttachmentKind::CrossData), Some(12));
    assert_eq!(descriptor.declared_size(AttachmentKind::Flags), Some(4));
    assert_eq!(descriptor.declared_size(AttachmentKind::ZeroLags), Some(6));
    // declared with size 0, so it must never appear
    assert_eq!(descriptor.declared_size(AttachmentKind::ActualTimes), None);
    assert_eq!(descriptor.declared_size(AttachmentKind::AutoData), None);

    let cross = &descriptor.binary_parts[&AttachmentKind::CrossData];
    assert_eq!(cross.axes, vec!["BAL", "BAB", "SPW", "SPP", "POL"]);
}

#[test]
fn test_image_windows_are_resolved() {
    let descriptor = decode_global_header(GLOBAL_HEADER).unwrap();
    let baseband = &descriptor.basebands[0];

    assert_eq!(baseband.name, "BB_1");
    assert_eq!(baseband.spectral_windows.len(), 2);
    assert_eq!(baseband.spectral_windows[0].image_index, Some(1));
    assert_eq!(baseband.spectral_windows[1].image_index, Some(0));
    assert_eq!(baseband.spectral_windows[0].cross_pol_products, vec!["XX", "YY"]);
    assert_eq!(baseband.spectral_windows[0].scale_factor, Some(1.0));
}

#[test]
fn test_undefined_image_is_rejected() {
    let xml = GLOBAL_HEADER.replace(r#"image="1""#, r#"image="9""#);
    let err = decode_global_header(&xml).unwrap_err();
    assert!(matches!(
        err,
        HeaderError::UndefinedImage { baseband: 0, window: 1, ref image } if image == "9"
    ));
}

#[test]
fn test_total_power_header() {
    let descriptor = decode_global_header(TP_GLOBAL_HEADER).unwrap();

    assert_eq!(descriptor.byte_order, ByteOrder::BigEndian);
    assert_eq!(descriptor.declared_integration_count(), Some(5));
    assert_eq!(descriptor.processor_type, ProcessorType::Radiometer);
    assert_eq!(descriptor.correlator_type, None);
    assert!(!descriptor.is_correlation());

    let auto = &descriptor.binary_parts[&AttachmentKind::AutoData];
    assert_eq!(auto.normalized, Some(false));
    assert_eq!(
        descriptor.basebands[0].spectral_windows[0].sd_pol_products,
        vec!["XX", "YY"]
    );
}

#[test]
fn test_missing_global_fields() {
    let xml = GLOBAL_HEADER.replace("<processorType>CORRELATOR</processorType>", "");
    assert!(matches!(
        decode_global_header(&xml),
        Err(HeaderError::MissingElement("processorType"))
    ));

    let xml = GLOBAL_HEADER.replace(r#"byteOrder="Little_Endian" "#, "");
    assert!(matches!(
        decode_global_header(&xml),
        Err(HeaderError::MissingAttribute { attribute: "byteOrder", .. })
    ));

    let xml = GLOBAL_HEADER.replace("CROSS_ONLY", "CROSS_SOMETIMES");
    assert!(matches!(
        decode_global_header(&xml),
        Err(HeaderError::InvalidValue { .. })
    ));

    assert!(decode_global_header("<notAHeader/>").is_err());
}

#[test]
fn test_invalid_project_path() {
    for path in ["3/1/4", "3/1/", "3/a/4/", "3/1/4/5/"] {
        let xml = GLOBAL_HEADER.replace("3/1/4/", path);
        assert!(
            matches!(
                decode_global_header(&xml),
                Err(HeaderError::InvalidProjectPath(_))
            ),
            "{path} should be rejected"
        );
    }
}

#[test]
fn test_decode_correlator_subset_header() {
    let global = decode_global_header(GLOBAL_HEADER).unwrap();
    let xml = corr_subset(
        "3/1/4/2/",
        r#"<flags xlink:href="uid://X1/X2/X3/2/flags.bin"/>
  <crossData xlink:href="uid://X1/X2/X3/2/crossData.bin" type="INT16_TYPE"/>"#,
    );

    let header = decode_subset_header(&xml, &global, SubsetSchema::Correlator).unwrap();
    assert_eq!(header.integration_num, Some(2));
    assert_eq!(header.subintegration_num, None);
    assert_eq!(header.time, 4_836_880_001_500_000_000);
    assert_eq!(header.interval, 1_000_000_000);
    assert_eq!(header.data_struct_ref, "sdmDataHeader");
    assert_eq!(header.cross_data_type, Some(CrossDataType::Int16));
    assert_eq!(
        header.refs[&AttachmentKind::Flags],
        "uid://X1/X2/X3/2/flags.bin"
    );
    assert!(header.abort.is_none());
}

#[test]
fn test_subintegration_path() {
    let global = decode_global_header(GLOBAL_HEADER).unwrap();
    let xml = corr_subset(
        "3/1/4/2/7/",
        r#"<crossData xlink:href="x/crossData.bin" type="float32"/>"#,
    );
    let header = decode_subset_header(&xml, &global, SubsetSchema::Correlator).unwrap();
    assert_eq!(header.subintegration_num, Some(7));
    assert_eq!(header.cross_data_type, Some(CrossDataType::Float32));
}

#[test]
fn test_subset_project_path_mismatch() {
    let global = decode_global_header(GLOBAL_HEADER).unwrap();
    let xml = corr_subset(
        "3/2/4/1/",
        r#"<crossData xlink:href="x/crossData.bin" type="INT32_TYPE"/>"#,
    );
    assert!(matches!(
        decode_subset_header(&xml, &global, SubsetSchema::Correlator),
        Err(HeaderError::ProjectPathMismatch { .. })
    ));
}

#[test]
fn test_unsupported_cross_data_type() {
    let global = decode_global_header(GLOBAL_HEADER).unwrap();
    let xml = corr_subset(
        "3/1/4/1/",
        r#"<crossData xlink:href="x/crossData.bin" type="FLOAT64_TYPE"/>"#,
    );
    assert!(matches!(
        decode_subset_header(&xml, &global, SubsetSchema::Correlator),
        Err(HeaderError::UnsupportedCrossDataType(ref t)) if t == "FLOAT64_TYPE"
    ));
}

#[test]
fn test_correlator_cross_data_requires_type() {
    let global = decode_global_header(GLOBAL_HEADER).unwrap();
    let xml = corr_subset("3/1/4/1/", r#"<crossData xlink:href="x/crossData.bin"/>"#);
    assert!(matches!(
        decode_subset_header(&xml, &global, SubsetSchema::Correlator),
        Err(HeaderError::MissingAttribute {
            attribute: "type",
            ..
        })
    ));
}

#[test]
fn test_mandatory_refs_follow_mode() {
    let global = decode_global_header(GLOBAL_HEADER).unwrap();
    let xml = corr_subset("3/1/4/1/", r#"<flags xlink:href="x/flags.bin"/>"#);
    assert!(matches!(
        decode_subset_header(&xml, &global, SubsetSchema::Correlator),
        Err(HeaderError::MissingElement("crossData"))
    ));
}

#[test]
fn test_aborted_subset_header() {
    let global = decode_global_header(GLOBAL_HEADER).unwrap();
    let xml = corr_subset(
        "3/1/4/1/",
        r#"<abortObservation>
    <stopTime>4836880002000000000</stopTime>
    <abortReason>operator cancelled</abortReason>
  </abortObservation>"#,
    );
    let header = decode_subset_header(&xml, &global, SubsetSchema::Correlator).unwrap();
    let abort = header.abort.unwrap();
    assert_eq!(abort.stop_time, 4_836_880_002_000_000_000);
    assert_eq!(abort.reason, "operator cancelled");
    assert!(header.refs.is_empty());
}

#[test]
fn test_total_power_subset_header() {
    let global = decode_global_header(TP_GLOBAL_HEADER).unwrap();
    assert_eq!(SubsetSchema::for_descriptor(&global), SubsetSchema::TotalPower);

    let xml = r#"<sdmDataSubsetHeader projectPath="7/2/1/">
  <schedulePeriodTime><time>150</time><interval>50</interval></schedulePeriodTime>
  <dataStruct ref="sdmDataHeader"/>
  <autoData href="7/2/1/autoData.bin"/>
</sdmDataSubsetHeader>"#;
    let header = decode_subset_header(xml, &global, SubsetSchema::TotalPower).unwrap();
    assert_eq!(header.integration_num, None);
    assert_eq!(header.time, 150);
    assert!(header.refs.contains_key(&AttachmentKind::AutoData));

    // total power paths carry exactly three numbers
    let xml = xml.replace("7/2/1/\">", "7/2/1/1/\">");
    assert!(matches!(
        decode_subset_header(&xml, &global, SubsetSchema::TotalPower),
        Err(HeaderError::InvalidProjectPath(_))
    ));
}
