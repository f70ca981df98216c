// This file is part of the terraform-provider-paas project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Closed value sets and sentinel defaults of service parameters.

// Defaults of the fields that cannot use 0 as "unset".
// The field is not sent until the user sets another value.
pub const MYSQL_GCS_FC_FACTOR_DEFAULT: f64 = -1.0;
pub const MYSQL_INNODB_THREAD_CONCURRENCY_DEFAULT: i64 = -1;
pub const MYSQL_THREAD_CACHE_SIZE_DEFAULT: i64 = -1;
pub const POSTGRESQL_MAX_PARALLEL_MAINTENANCE_WORKERS_DEFAULT: i64 = -1;
pub const POSTGRESQL_WAL_KEEP_SEGMENTS_DEFAULT: i64 = -1;

pub const MYSQL_DATABASE_USER_PRIVILEGES: &[&str] = &[
    "ALL",
    "ALTER",
    "ALTER ROUTINE",
    "CREATE",
    "CREATE ROUTINE",
    "CREATE TEMPORARY TABLES",
    "CREATE VIEW",
    "DELETE",
    "DROP",
    "EVENT",
    "EXECUTE",
    "INDEX",
    "INSERT",
    "LOCK TABLES",
    "SELECT",
    "SHOW VIEW",
    "TRIGGER",
    "UPDATE",
];

pub const POSTGRESQL_DATABASE_EXTENSIONS: &[&str] = &[
    "address_standardizer",
    "address_standardizer_data_us",
    "amcheck",
    "autoinc",
    "bloom",
    "btree_gin",
    "btree_gist",
    "citext",
    "cube",
    "dblink",
    "dict_int",
    "dict_xsyn",
    "earthdistance",
    "fuzzystrmatch",
    "hstore",
    "intarray",
    "isn",
    "lo",
    "ltree",
    "moddatetime",
    "pg_buffercache",
    "pg_trgm",
    "pg_visibility",
    "pgcrypto",
    "pgrowlocks",
    "pgstattuple",
    "postgis",
    "postgis_tiger_geocoder",
    "postgis_topology",
    "postgres_fdw",
    "seg",
    "tablefunc",
    "tcn",
    "timescaledb",
    "tsm_system_rows",
    "tsm_system_time",
    "unaccent",
    "uuid-ossp",
    "xml2",
];

pub const POSTGRESQL_DATABASE_LOCALES: &[&str] = &[
    "C",
    "aa_DJ.UTF-8",
    "aa_ER.UTF-8",
    "aa_ET.UTF-8",
    "af_ZA.UTF-8",
    "am_ET.UTF-8",
    "an_ES.UTF-8",
    "ar_AE.UTF-8",
    "ar_BH.UTF-8",
    "ar_DZ.UTF-8",
    "ar_EG.UTF-8",
    "ar_IN.UTF-8",
    "ar_IQ.UTF-8",
    "ar_JO.UTF-8",
    "ar_KW.UTF-8",
    "ar_LB.UTF-8",
    "ar_LY.UTF-8",
    "ar_MA.UTF-8",
    "ar_OM.UTF-8",
    "ar_QA.UTF-8",
    "ar_SA.UTF-8",
    "ar_SD.UTF-8",
    "ar_SY.UTF-8",
    "ar_TN.UTF-8",
    "ar_YE.UTF-8",
    "as_IN.UTF-8",
    "ast_ES.UTF-8",
    "az_AZ.UTF-8",
    "be_BY.UTF-8",
    "bem_ZM.UTF-8",
    "ber_DZ.UTF-8",
    "ber_MA.UTF-8",
    "bg_BG.UTF-8",
    "bho_IN.UTF-8",
    "bn_BD.UTF-8",
    "bn_IN.UTF-8",
    "bo_CN.UTF-8",
    "bo_IN.UTF-8",
    "br_FR.UTF-8",
    "brx_IN.UTF-8",
    "bs_BA.UTF-8",
    "byn_ER.UTF-8",
    "ca_AD.UTF-8",
    "ca_ES.UTF-8",
    "ca_FR.UTF-8",
    "ca_IT.UTF-8",
    "crh_UA.UTF-8",
    "csb_PL.UTF-8",
    "cs_CZ.UTF-8",
    "cv_RU.UTF-8",
    "cy_GB.UTF-8",
    "da_DK.UTF-8",
    "de_AT.UTF-8",
    "de_BE.UTF-8",
    "de_CH.UTF-8",
    "de_DE.UTF-8",
    "de_LU.UTF-8",
    "dv_MV.UTF-8",
    "dz_BT.UTF-8",
    "el_CY.UTF-8",
    "el_GR.UTF-8",
    "en_AG.UTF-8",
    "en_AU.UTF-8",
    "en_BW.UTF-8",
    "en_CA.UTF-8",
    "en_DK.UTF-8",
    "en_GB.UTF-8",
    "en_HK.UTF-8",
    "en_IE.UTF-8",
    "en_IN.UTF-8",
    "en_NG.UTF-8",
    "en_NZ.UTF-8",
    "en_PH.UTF-8",
    "en_SG.UTF-8",
    "en_US.UTF-8",
    "en_ZA.UTF-8",
    "en_ZM.UTF-8",
    "en_ZW.UTF-8",
    "es_AR.UTF-8",
    "es_BO.UTF-8",
    "es_CL.UTF-8",
    "es_CO.UTF-8",
    "es_CR.UTF-8",
    "es_CU.UTF-8",
    "es_DO.UTF-8",
    "es_EC.UTF-8",
    "es_ES.UTF-8",
    "es_GT.UTF-8",
    "es_HN.UTF-8",
    "es_MX.UTF-8",
    "es_NI.UTF-8",
    "es_PA.UTF-8",
    "es_PE.UTF-8",
    "es_PR.UTF-8",
    "es_PY.UTF-8",
    "es_SV.UTF-8",
    "es_US.UTF-8",
    "es_UY.UTF-8",
    "es_VE.UTF-8",
    "et_EE.UTF-8",
    "eu_ES.UTF-8",
    "fa_IR.UTF-8",
    "ff_SN.UTF-8",
    "fi_FI.UTF-8",
    "fil_PH.UTF-8",
    "fo_FO.UTF-8",
    "fr_BE.UTF-8",
    "fr_CA.UTF-8",
    "fr_CH.UTF-8",
    "fr_FR.UTF-8",
    "fr_LU.UTF-8",
    "fur_IT.UTF-8",
    "fy_DE.UTF-8",
    "fy_NL.UTF-8",
    "ga_IE.UTF-8",
    "gd_GB.UTF-8",
    "gez_ER.UTF-8",
    "gez_ET.UTF-8",
    "gl_ES.UTF-8",
    "gu_IN.UTF-8",
    "gv_GB.UTF-8",
    "ha_NG.UTF-8",
    "he_IL.UTF-8",
    "hi_IN.UTF-8",
    "hne_IN.UTF-8",
    "hr_HR.UTF-8",
    "hsb_DE.UTF-8",
    "ht_HT.UTF-8",
    "hu_HU.UTF-8",
    "hy_AM.UTF-8",
    "id_ID.UTF-8",
    "ig_NG.UTF-8",
    "ik_CA.UTF-8",
    "is_IS.UTF-8",
    "it_CH.UTF-8",
    "it_IT.UTF-8",
    "iu_CA.UTF-8",
    "iw_IL.UTF-8",
    "ja_JP.UTF-8",
    "ka_GE.UTF-8",
    "kk_KZ.UTF-8",
    "kl_GL.UTF-8",
    "km_KH.UTF-8",
    "kn_IN.UTF-8",
    "kok_IN.UTF-8",
    "ko_KR.UTF-8",
    "ks_IN.UTF-8",
    "ku_TR.UTF-8",
    "kw_GB.UTF-8",
    "ky_KG.UTF-8",
    "lb_LU.UTF-8",
    "lg_UG.UTF-8",
    "li_BE.UTF-8",
    "lij_IT.UTF-8",
    "li_NL.UTF-8",
    "lo_LA.UTF-8",
    "lt_LT.UTF-8",
    "lv_LV.UTF-8",
    "mai_IN.UTF-8",
    "mg_MG.UTF-8",
    "mhr_RU.UTF-8",
    "mi_NZ.UTF-8",
    "mk_MK.UTF-8",
    "ml_IN.UTF-8",
    "mn_MN.UTF-8",
    "mr_IN.UTF-8",
    "ms_MY.UTF-8",
    "mt_MT.UTF-8",
    "my_MM.UTF-8",
    "nb_NO.UTF-8",
    "nds_DE.UTF-8",
    "nds_NL.UTF-8",
    "ne_NP.UTF-8",
    "nl_AW.UTF-8",
    "nl_BE.UTF-8",
    "nl_NL.UTF-8",
    "nn_NO.UTF-8",
    "nr_ZA.UTF-8",
    "nso_ZA.UTF-8",
    "oc_FR.UTF-8",
    "om_ET.UTF-8",
    "om_KE.UTF-8",
    "or_IN.UTF-8",
    "os_RU.UTF-8",
    "pa_IN.UTF-8",
    "pap_AN.UTF-8",
    "pa_PK.UTF-8",
    "pl_PL.UTF-8",
    "ps_AF.UTF-8",
    "pt_BR.UTF-8",
    "pt_PT.UTF-8",
    "ro_RO.UTF-8",
    "ru_RU.UTF-8",
    "ru_UA.UTF-8",
    "rw_RW.UTF-8",
    "sa_IN.UTF-8",
    "sc_IT.UTF-8",
    "sd_IN.UTF-8",
    "se_NO.UTF-8",
    "shs_CA.UTF-8",
    "sid_ET.UTF-8",
    "si_LK.UTF-8",
    "sk_SK.UTF-8",
    "sl_SI.UTF-8",
    "so_DJ.UTF-8",
    "so_ET.UTF-8",
    "so_KE.UTF-8",
    "so_SO.UTF-8",
    "sq_AL.UTF-8",
    "sq_MK.UTF-8",
    "sr_ME.UTF-8",
    "sr_RS.UTF-8",
    "ss_ZA.UTF-8",
    "st_ZA.UTF-8",
    "sv_FI.UTF-8",
    "sv_SE.UTF-8",
    "sw_KE.UTF-8",
    "sw_TZ.UTF-8",
    "ta_IN.UTF-8",
    "ta_LK.UTF-8",
    "te_IN.UTF-8",
    "tg_TJ.UTF-8",
    "th_TH.UTF-8",
    "ti_ER.UTF-8",
    "ti_ET.UTF-8",
    "tig_ER.UTF-8",
    "tk_TM.UTF-8",
    "tl_PH.UTF-8",
    "tn_ZA.UTF-8",
    "tr_CY.UTF-8",
    "tr_TR.UTF-8",
    "ts_ZA.UTF-8",
    "tt_RU.UTF-8",
    "ug_CN.UTF-8",
    "uk_UA.UTF-8",
    "unm_US.UTF-8",
    "ur_IN.UTF-8",
    "ur_PK.UTF-8",
    "ve_ZA.UTF-8",
    "vi_VN.UTF-8",
    "wa_BE.UTF-8",
    "wae_CH.UTF-8",
    "wal_ET.UTF-8",
    "wo_SN.UTF-8",
    "xh_ZA.UTF-8",
    "yi_US.UTF-8",
    "yo_NG.UTF-8",
    "yue_HK.UTF-8",
    "zh_CN.UTF-8",
    "zh_HK.UTF-8",
    "zh_SG.UTF-8",
    "zh_TW.UTF-8",
    "zu_ZA.UTF-8",
];

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn value_sets_are_unique() {
        for values in [
            MYSQL_DATABASE_USER_PRIVILEGES,
            POSTGRESQL_DATABASE_EXTENSIONS,
            POSTGRESQL_DATABASE_LOCALES,
        ] {
            let unique: BTreeSet<_> = values.iter().collect();
            assert_eq!(unique.len(), values.len());
            assert!(values.iter().all(|v| v.trim() == *v));
        }
    }

    #[test]
    fn default_locale_is_allowed() {
        assert!(POSTGRESQL_DATABASE_LOCALES.contains(&"ru_RU.UTF-8"));
        assert!(POSTGRESQL_DATABASE_EXTENSIONS.contains(&"pg_visibility"));
    }
}
