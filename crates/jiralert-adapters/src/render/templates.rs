pub const SUMMARY: &str = "{{commonLabels.alertname}}: {{commonAnnotations.summary}}";

pub const DESCRIPTION: &str = r#"h2. Common information
{noformat:borderStyle=none|bgColor=#FFFFFF}Group key: {{groupKey}}{noformat}
[Alertmanager|{{externalURL}}/#/alerts?receiver={{urlencode receiver}}&filter={{urlencode groupFilter}}]

_Common_Annotations_:
{{#each commonAnnotations}}
* *{{@key}}*: {{this}}
{{/each}}

_Common_Labels_:
{{#each commonLabels}}
* {{@key}}: "{{this}}"
{{/each}}


h2. Active alerts (total : {{alertCount}})
{{#each alerts}}
• {{summary}} ([documentation|{{documentation}}], [source|{{generatorURL}}]){color:#fff} - {{hash}}{color}
{{/each}}
"#;
