// Flatgram - Hierarchical Flat-File Record Grammar
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Writer output read back by the matching tokenizer.

use flatgram_stream::{
    CsvReader, CsvReaderConfig, CsvWriter, CsvWriterConfig, DelimitedReader,
    DelimitedReaderConfig, DelimitedWriter, DelimitedWriterConfig, RecordWriter,
};
use proptest::prelude::*;

fn field() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z,\"\t\\\\ \n]{0,8}").unwrap()
}

fn records() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(field(), 1..5), 1..10)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Fields survive CSV quoting and each record starts on the line the
    /// writer was at.
    #[test]
    fn csv_fields_and_lines_survive(records in records()) {
        let mut writer = CsvWriter::new(Vec::new(), CsvWriterConfig::default()).unwrap();
        let mut starts = Vec::new();
        for record in &records {
            starts.push(writer.line_number() + 1);
            let fields: Vec<&str> = record.iter().map(String::as_str).collect();
            writer.write(&fields).unwrap();
        }
        let text = writer.into_inner();

        let read: Vec<_> = CsvReader::new(text.as_slice(), CsvReaderConfig::default())
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        prop_assert_eq!(read.len(), records.len());
        for ((raw, record), start) in read.iter().zip(&records).zip(&starts) {
            prop_assert_eq!(&raw.fields, record);
            prop_assert_eq!(raw.line, *start);
        }
    }

    /// Escaped delimited fields read back unchanged.
    #[test]
    fn delimited_escaping_survives(records in records()) {
        let records: Vec<Vec<String>> = records
            .into_iter()
            .map(|r| r.into_iter().map(|f| f.replace('\n', " ")).collect())
            .collect();
        let mut writer = DelimitedWriter::new(
            Vec::new(),
            DelimitedWriterConfig { escape: Some('\\'), ..Default::default() },
        )
        .unwrap();
        for record in &records {
            let fields: Vec<&str> = record.iter().map(String::as_str).collect();
            writer.write(&fields).unwrap();
        }
        let text = writer.into_inner();

        let config = DelimitedReaderConfig { escape: Some('\\'), ..Default::default() };
        let read: Vec<_> = DelimitedReader::new(text.as_slice(), config)
            .unwrap()
            .map(|r| r.unwrap().fields)
            .collect();
        prop_assert_eq!(read, records);
    }
}
