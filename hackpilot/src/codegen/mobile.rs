//! Expo / React Native app with bottom tabs.

use super::{Blueprint, FeatureTemplate, FileTemplate};

pub(super) static BLUEPRINT: Blueprint = Blueprint {
    slots: &["rn_imports", "rn_screens", "js_deps", "env"],
    base: &[
        FileTemplate {
            path: "README.md",
            body: r#"# {{name}}

Mobile app scaffolded by hackpilot ({{style}} style), built with Expo.

## Features

{{features_markdown}}
## Run locally

```bash
npm install
npx expo start
```
"#,
        },
        FileTemplate {
            path: "package.json",
            body: r#"{
  "name": "{{slug}}",
  "version": "0.1.0",
  "main": "node_modules/expo/AppEntry.js",
  "scripts": {
    "start": "expo start",
    "android": "expo start --android",
    "ios": "expo start --ios"
  },
  "dependencies": {
{{js_deps}}    "@react-navigation/bottom-tabs": "^6.6.1",
    "@react-navigation/native": "^6.1.18",
    "expo": "~51.0.28",
    "react": "18.2.0",
    "react-native": "0.74.5",
    "react-native-safe-area-context": "4.10.5",
    "react-native-screens": "3.31.1"
  }
}
"#,
        },
        FileTemplate {
            path: "app.json",
            body: r#"{
  "expo": {
    "name": "{{name}}",
    "slug": "{{slug}}",
    "version": "0.1.0",
    "orientation": "portrait",
    "userInterfaceStyle": "automatic"
  }
}
"#,
        },
        FileTemplate {
            path: ".env.example",
            body: "EXPO_PUBLIC_API_URL=http://localhost:8000\n{{env}}",
        },
        FileTemplate {
            path: ".gitignore",
            body: "node_modules/\n.expo/\n.env\n",
        },
        FileTemplate {
            path: "App.js",
            body: r#"import { NavigationContainer } from '@react-navigation/native';
import { createBottomTabNavigator } from '@react-navigation/bottom-tabs';
import HomeScreen from './src/screens/HomeScreen';
{{rn_imports}}
const Tab = createBottomTabNavigator();

export default function App() {
  return (
    <NavigationContainer>
      <Tab.Navigator>
        <Tab.Screen name="Home" component={HomeScreen} />
{{rn_screens}}      </Tab.Navigator>
    </NavigationContainer>
  );
}
"#,
        },
        FileTemplate {
            path: "src/theme.js",
            body: r#"export const colors = {
  primary: '{{primary}}',
  secondary: '{{secondary}}',
  accent: '{{accent}}',
  background: '{{background}}',
  text: '{{text}}',
};

export const spacing = (n) => n * 8;
"#,
        },
        FileTemplate {
            path: "src/screens/HomeScreen.js",
            body: r#"import { StyleSheet, Text, View } from 'react-native';
import { colors, spacing } from '../theme';

export default function HomeScreen() {
  return (
    <View style={styles.container}>
      <Text style={styles.title}>{{name}}</Text>
      <Text style={styles.body}>Welcome! Use the tabs below to explore.</Text>
    </View>
  );
}

const styles = StyleSheet.create({
  container: { flex: 1, padding: spacing(3), backgroundColor: colors.background },
  title: { fontSize: 28, fontWeight: '700', color: colors.primary },
  body: { marginTop: spacing(1), color: colors.text },
});
"#,
        },
    ],
    per_feature: &[FileTemplate {
        path: "src/screens/{{Feature}}Screen.js",
        body: r#"import { StyleSheet, Text, View } from 'react-native';
import { colors, spacing } from '../theme';

export default function {{Feature}}Screen() {
  return (
    <View style={styles.container}>
      <Text style={styles.title}>{{Feature}}</Text>
      <Text style={styles.body}>{{summary}}</Text>
    </View>
  );
}

const styles = StyleSheet.create({
  container: { flex: 1, padding: spacing(3), backgroundColor: colors.background },
  title: { fontSize: 22, fontWeight: '600', color: colors.primary },
  body: { marginTop: spacing(1), color: colors.text },
});
"#,
    }],
    per_feature_snippets: &[
        (
            "rn_imports",
            "import {{Feature}}Screen from './src/screens/{{Feature}}Screen';\n",
        ),
        (
            "rn_screens",
            "        <Tab.Screen name=\"{{Feature}}\" component={ {{Feature}}Screen } />\n",
        ),
    ],
    features: &[
        FeatureTemplate {
            name: "auth",
            summary: "Sign in and keep the session in secure storage.",
            files: &[FileTemplate {
                path: "src/session.js",
                body: r#"import * as SecureStore from 'expo-secure-store';

const KEY = '{{slug}}-session';

export async function saveSession(token) {
  await SecureStore.setItemAsync(KEY, token);
}

export async function loadSession() {
  return SecureStore.getItemAsync(KEY);
}

export async function clearSession() {
  await SecureStore.deleteItemAsync(KEY);
}
"#,
            }],
            snippets: &[("js_deps", "    \"expo-secure-store\": \"~13.0.2\",\n")],
        },
        FeatureTemplate {
            name: "profile",
            summary: "User profile with editable details.",
            files: &[],
            snippets: &[],
        },
        FeatureTemplate {
            name: "notifications",
            summary: "Push notifications for important events.",
            files: &[],
            snippets: &[
                ("js_deps", "    \"expo-notifications\": \"~0.28.16\",\n"),
                ("env", "EXPO_PUBLIC_PUSH_ENABLED=true\n"),
            ],
        },
        FeatureTemplate {
            name: "camera",
            summary: "Capture photos straight from the app.",
            files: &[],
            snippets: &[("js_deps", "    \"expo-camera\": \"~15.0.16\",\n")],
        },
        FeatureTemplate {
            name: "offline",
            summary: "Local cache so the app keeps working without a network.",
            files: &[FileTemplate {
                path: "src/cache.js",
                body: r#"import AsyncStorage from '@react-native-async-storage/async-storage';

export async function cacheSet(key, value) {
  await AsyncStorage.setItem(key, JSON.stringify(value));
}

export async function cacheGet(key) {
  const raw = await AsyncStorage.getItem(key);
  return raw === null ? null : JSON.parse(raw);
}
"#,
            }],
            snippets: &[(
                "js_deps",
                "    \"@react-native-async-storage/async-storage\": \"1.23.1\",\n",
            )],
        },
    ],
};
